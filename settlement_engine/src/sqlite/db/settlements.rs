use sqlx::{types::Json, SqliteConnection};

use crate::{db_types::Settlement, traits::SettlementError};

/// Inserts the idempotency record for a settled payment. The `gateway_payment_id` column is unique; a violation is
/// surfaced as [`SettlementError::DuplicateSettlement`] so the caller can replay the original result instead of
/// settling the same payment twice.
pub async fn insert_settlement(
    gateway_payment_id: &str,
    gateway_order_id: &str,
    customer_id: &str,
    order_numbers: &[String],
    conn: &mut SqliteConnection,
) -> Result<Settlement, SettlementError> {
    let result = sqlx::query_as(
        r#"
            INSERT INTO settlements (gateway_payment_id, gateway_order_id, customer_id, order_numbers)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(gateway_payment_id)
    .bind(gateway_order_id)
    .bind(customer_id)
    .bind(Json(order_numbers.to_vec()))
    .fetch_one(conn)
    .await;
    match result {
        Ok(settlement) => Ok(settlement),
        Err(e) if e.as_database_error().map(|d| d.is_unique_violation()).unwrap_or(false) => {
            Err(SettlementError::DuplicateSettlement(gateway_payment_id.to_string()))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_by_payment_id(
    gateway_payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Settlement>, SettlementError> {
    let settlement = sqlx::query_as("SELECT * FROM settlements WHERE gateway_payment_id = $1")
        .bind(gateway_payment_id)
        .fetch_optional(conn)
        .await?;
    Ok(settlement)
}
