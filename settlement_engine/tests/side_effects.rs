//! The side-effect emitter runs strictly after the commit, and each emission is independent: a handler that blows up
//! on one order must neither roll back the settlement nor stop the other orders' notifications from being attempted.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use settlement_engine::{
    db_types::Money,
    events::{EventHandler, EventProducers, OrderCreatedEvent},
    SettlementApi,
    SettlementDatabase,
};

mod support;

use support::{cart_item_for, new_settlement, new_test_db, seed_product, test_schedule};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_failing_notification_does_not_block_the_others() {
    let db = new_test_db().await;
    let desk = seed_product(&db, "vendor-a", "Desk", Money::from_whole(300), 5).await;
    let lamp = seed_product(&db, "vendor-b", "Lamp", Money::from_whole(200), 5).await;

    let attempts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = attempts.clone();
    let handler = Arc::new(move |ev: OrderCreatedEvent| {
        let attempts = seen.clone();
        Box::pin(async move {
            let number = ev.order.order_number.as_str().to_string();
            attempts.lock().unwrap().push(number.clone());
            // the first order's notification dies; the second must still be attempted
            if number.ends_with('1') {
                panic!("simulated notification failure for {number}");
            }
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let event_handler = EventHandler::new(8, handler);
    let producers = EventProducers { order_created_producer: vec![event_handler.subscribe()] };
    let api = SettlementApi::new(db.clone(), test_schedule(), producers);

    let receipt = api
        .settle(new_settlement("cust-1", "pay_777", vec![cart_item_for(&desk, 1), cart_item_for(&lamp, 1)]))
        .await
        .unwrap();
    assert_eq!(receipt.orders.len(), 2);

    // dropping the api drops the last producer, so the handler drains its queue and shuts down
    drop(api);
    event_handler.start_handler().await;

    let attempts = attempts.lock().unwrap().clone();
    assert_eq!(attempts.len(), 2, "both notifications must be attempted, got {attempts:?}");
    assert!(attempts.contains(&receipt.order_numbers[0]));
    assert!(attempts.contains(&receipt.order_numbers[1]));

    // the panicking handler changed nothing about the committed settlement
    assert!(db.fetch_settlement_by_payment_id("pay_777").await.unwrap().is_some());
}
