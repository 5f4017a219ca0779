use log::debug;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{CartItem, Money},
    traits::SettlementError,
};

#[derive(FromRow)]
struct CartItemRow {
    product_id: i64,
    name: String,
    price: Money,
    stock_at_add: i64,
    quantity: i64,
    vendor_id: String,
    images: Json<Vec<String>>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem {
            product_id: row.product_id,
            name: row.name,
            price: row.price,
            stock_at_add: row.stock_at_add,
            quantity: row.quantity,
            vendor_id: row.vendor_id,
            images: row.images.0,
        }
    }
}

pub async fn add_cart_item(user_id: &str, item: CartItem, conn: &mut SqliteConnection) -> Result<(), SettlementError> {
    sqlx::query(
        r#"
            INSERT INTO cart_items (user_id, product_id, name, price, stock_at_add, quantity, vendor_id, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8);
        "#,
    )
    .bind(user_id)
    .bind(item.product_id)
    .bind(item.name)
    .bind(item.price)
    .bind(item.stock_at_add)
    .bind(item.quantity)
    .bind(item.vendor_id)
    .bind(Json(item.images))
    .execute(conn)
    .await?;
    Ok(())
}

/// The user's cart, in the order items were added.
pub async fn fetch_cart_items(user_id: &str, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, SettlementError> {
    let rows: Vec<CartItemRow> = sqlx::query_as(
        "SELECT product_id, name, price, stock_at_add, quantity, vendor_id, images FROM cart_items WHERE user_id = \
         $1 ORDER BY id ASC",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(CartItem::from).collect())
}

/// Empties the user's cart. Returns the number of items removed.
pub async fn clear_cart(user_id: &str, conn: &mut SqliteConnection) -> Result<u64, SettlementError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    let removed = result.rows_affected();
    debug!("🛒️ Cleared {removed} items from the cart of user [{user_id}]");
    Ok(removed)
}
