//! The server's side-effect wiring: what actually happens when the engine announces a created order.
//!
//! Everything in here is best-effort by design. A failed write is logged for operational visibility and otherwise
//! swallowed; the settlement it follows has already committed.

use std::{future::Future, pin::Pin};

use log::*;
use settlement_engine::{
    db_types::{NewNotification, NewOrderActivity},
    events::OrderCreatedEvent,
    OrderManagement,
};

/// Handles one `OrderCreated` event: records a notification for the customer and appends a `customer_notified`
/// entry to the order's audit trail.
pub fn notify_order_created<B>(db: B, event: OrderCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>
where B: OrderManagement + Send + Sync + 'static {
    Box::pin(async move {
        let order = event.order;
        trace!("📬️ Recording notification for order {}", order.order_number);
        let notification = NewNotification {
            user_id: order.customer_id.clone(),
            order_number: order.order_number.clone(),
            kind: "order_created".to_string(),
            title: format!("Order {} confirmed", order.order_number),
            body: format!(
                "Your order {} ({} total) has been placed and sent to the vendor. A confirmation was sent to {}.",
                order.order_number, order.total, event.customer_email
            ),
        };
        if let Err(e) = db.insert_notification(notification).await {
            warn!("📬️ Could not record notification for order {}: {e}", order.order_number);
        }
        let entry = NewOrderActivity::system(
            "customer_notified",
            format!("Order confirmation queued for {}", event.customer_email),
        );
        if let Err(e) = db.append_order_activity(order.id, entry).await {
            warn!("📬️ Could not append notification activity for order {}: {e}", order.order_number);
        }
    })
}
