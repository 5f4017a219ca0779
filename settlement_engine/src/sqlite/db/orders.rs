use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{NewOrder, NewOrderActivity, Order, OrderActivity, OrderItem, OrderNumber, PaymentStatus},
    traits::SettlementError,
};

/// Inserts a full order draft: the order row, one row per item, and the initial `order_created` audit entry. This is
/// not atomic on its own; the settlement commit embeds it in a transaction by passing `&mut *tx`.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, SettlementError> {
    let created: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_number,
                customer_id,
                vendor_id,
                subtotal,
                discount,
                delivery_fee,
                service_fee,
                processing_fee,
                total,
                vendor_payout,
                payment_status,
                delivery_option,
                payment_method,
                shipping_address,
                gateway_order_id,
                gateway_payment_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *;
        "#,
    )
    .bind(&order.order_number)
    .bind(&order.customer_id)
    .bind(&order.vendor_id)
    .bind(order.fees.subtotal)
    .bind(order.fees.discount)
    .bind(order.fees.delivery_fee)
    .bind(order.fees.customer_service_fee)
    .bind(order.fees.vendor_processing_fee)
    .bind(order.fees.total_charged)
    .bind(order.fees.vendor_payout)
    .bind(PaymentStatus::Completed)
    .bind(order.delivery_option)
    .bind(&order.payment_method)
    .bind(Json(order.shipping_address.clone()))
    .bind(&order.gateway_order_id)
    .bind(&order.gateway_payment_id)
    .fetch_one(&mut *conn)
    .await?;
    for item in &order.items {
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, product_id, name, price, quantity, vendor_id, images)
                VALUES ($1, $2, $3, $4, $5, $6, $7);
            "#,
        )
        .bind(created.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(&item.vendor_id)
        .bind(Json(item.images.clone()))
        .execute(&mut *conn)
        .await?;
    }
    let note = NewOrderActivity::system(
        "order_created",
        format!("Order {} created at settlement of gateway payment {}", created.order_number, order.gateway_payment_id),
    );
    insert_activity(created.id, note, conn).await?;
    debug!("🧾️ Order {} inserted with id {}", created.order_number, created.id);
    Ok(created)
}

pub async fn fetch_order_by_number(
    number: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SettlementError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE order_number = $1")
        .bind(number.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, SettlementError> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Appends one entry to the order's audit trail. There is deliberately no update or delete counterpart.
pub async fn insert_activity(
    order_id: i64,
    entry: NewOrderActivity,
    conn: &mut SqliteConnection,
) -> Result<OrderActivity, SettlementError> {
    let entry = sqlx::query_as(
        r#"
            INSERT INTO order_activity (
                order_id, action, description, performed_by, performed_by_role, previous_value, new_value
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(entry.action)
    .bind(entry.description)
    .bind(entry.performed_by)
    .bind(entry.performed_by_role)
    .bind(entry.previous_value)
    .bind(entry.new_value)
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

pub async fn fetch_activity(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderActivity>, SettlementError> {
    let entries = sqlx::query_as("SELECT * FROM order_activity WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(entries)
}
