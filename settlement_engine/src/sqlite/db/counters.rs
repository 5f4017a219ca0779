use log::trace;
use sqlx::SqliteConnection;

use crate::traits::SettlementError;

/// Advances the named counter by one and returns the new value, creating the counter lazily on first use.
///
/// The whole read-modify-write runs in a single statement, so SQLite's write lock serializes concurrent callers and
/// no two of them can ever observe the same value. Embed the call in a transaction by passing `&mut *tx` when the
/// allocation must commit or roll back with other writes.
pub async fn next_in_sequence(name: &str, conn: &mut SqliteConnection) -> Result<i64, SettlementError> {
    let (value,): (i64,) = sqlx::query_as(
        r#"
            INSERT INTO counters (name, last_value) VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET last_value = last_value + 1, updated_at = CURRENT_TIMESTAMP
            RETURNING last_value;
        "#,
    )
    .bind(name)
    .fetch_one(conn)
    .await?;
    trace!("🔢️ Counter [{name}] advanced to {value}");
    Ok(value)
}

/// The current value of the named counter, or `None` if nothing has been allocated from it yet.
pub async fn current_value(name: &str, conn: &mut SqliteConnection) -> Result<Option<i64>, SettlementError> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT last_value FROM counters WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(row.map(|(v,)| v))
}
