//! Concurrency properties of the sequence allocator: many parallel callers on one counter key never observe a
//! duplicate value, and independent keys do not interfere.

use std::collections::HashSet;

use log::*;
use settlement_engine::{helpers::ORDER_SEQUENCE, SequenceAllocation};

mod support;

const CALLERS: usize = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn burst_allocations_have_no_duplicates() {
    let db = support::new_test_db().await;
    info!("🚀️ Spawning {CALLERS} concurrent allocators");
    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let db = db.clone();
        handles.push(tokio::spawn(async move { db.allocate_sequence(ORDER_SEQUENCE).await }));
    }
    let mut values = Vec::with_capacity(CALLERS);
    for handle in handles {
        let value = handle.await.expect("allocator task panicked").expect("allocation failed");
        values.push(value);
    }
    let unique: HashSet<i64> = values.iter().copied().collect();
    assert_eq!(unique.len(), CALLERS, "duplicate sequence values were issued: {values:?}");
    // All callers succeeded, so the counter advanced exactly once per caller.
    assert_eq!(*unique.iter().min().unwrap(), 1);
    assert_eq!(*unique.iter().max().unwrap(), CALLERS as i64);
    info!("🚀️ burst complete");
}

#[tokio::test]
async fn counters_are_independent_per_key() {
    let db = support::new_test_db().await;
    assert_eq!(db.allocate_sequence(ORDER_SEQUENCE).await.unwrap(), 1);
    assert_eq!(db.allocate_sequence(ORDER_SEQUENCE).await.unwrap(), 2);
    // a different key starts its own sequence, lazily
    assert_eq!(db.allocate_sequence("user").await.unwrap(), 1);
    assert_eq!(db.allocate_sequence("ticket:2026-08-06").await.unwrap(), 1);
    assert_eq!(db.allocate_sequence(ORDER_SEQUENCE).await.unwrap(), 3);
}
