//! Human-readable formatting for allocated sequence numbers.
//!
//! Formatting is a pure function of the allocated integer and is deliberately separate from the allocator's
//! correctness contract. The only requirement is that distinct integers never format to the same string, which the
//! zero-padded decimal rendering guarantees (padding overflows gracefully past eight digits).

use chrono::NaiveDate;

use crate::db_types::OrderNumber;

/// The counter key used for order numbers.
pub const ORDER_SEQUENCE: &str = "order";
/// Support ticket counters are scoped per day: `ticket:2026-08-06`.
pub const TICKET_SEQUENCE_PREFIX: &str = "ticket";
/// The counter key used for customer account numbers.
pub const USER_SEQUENCE: &str = "user";

pub fn order_number(seq: i64) -> OrderNumber {
    OrderNumber(format!("ORD-{seq:08}"))
}

pub fn ticket_number(date: NaiveDate, seq: i64) -> String {
    format!("TKT-{}-{seq:04}", date.format("%Y%m%d"))
}
