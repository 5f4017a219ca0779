//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction as
//! the need arises and call through to the functions without any other changes. The settlement commit is built
//! exactly this way: the same functions run inside one transaction.

use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod carts;
pub mod counters;
pub mod coupons;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod settlements;

const SQLITE_DB_URL: &str = "sqlite://data/settlement_store.db";

pub fn db_url() -> String {
    let result = env::var("OSG_DATABASE_URL").unwrap_or_else(|_| {
        info!("OSG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Whether the error is SQLite reporting a write-write conflict (`SQLITE_BUSY` and friends), i.e. worth retrying
/// within the budget. SQLite's busy message is stable, so matching on it is dependable even after the error has been
/// stringified at the settlement layer.
pub fn is_busy_settlement(e: &crate::traits::SettlementError) -> bool {
    matches!(
        e,
        crate::traits::SettlementError::DatabaseError(msg)
            if msg.contains("database is locked") || msg.contains("timed out")
    )
}
