use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewProduct, Product},
    traits::SettlementError,
};

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SettlementError> {
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (vendor_id, name, price, stock) VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(product.vendor_id)
    .bind(product.name)
    .bind(product.price)
    .bind(product.stock)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, SettlementError> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Subtracts `quantity` from the product's stock. The decrement deliberately does not clamp at zero and does not
/// re-validate availability; availability was only checked at cart-add time. The only failure is a product row that
/// no longer exists.
pub async fn decrement_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), SettlementError> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
    )
    .bind(quantity)
    .bind(product_id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(SettlementError::ProductNotFound(product_id));
    }
    trace!("📦️ Stock for product {product_id} reduced by {quantity}");
    Ok(())
}
