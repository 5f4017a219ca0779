use sqlx::SqliteConnection;

use crate::{
    db_types::{NewNotification, Notification},
    traits::SettlementError,
};

pub async fn insert_notification(
    notification: NewNotification,
    conn: &mut SqliteConnection,
) -> Result<Notification, SettlementError> {
    let notification = sqlx::query_as(
        r#"
            INSERT INTO notifications (user_id, order_number, kind, title, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(notification.user_id)
    .bind(notification.order_number)
    .bind(notification.kind)
    .bind(notification.title)
    .bind(notification.body)
    .fetch_one(conn)
    .await?;
    Ok(notification)
}

pub async fn fetch_for_user(user_id: &str, conn: &mut SqliteConnection) -> Result<Vec<Notification>, SettlementError> {
    let notifications = sqlx::query_as("SELECT * FROM notifications WHERE user_id = $1 ORDER BY id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(notifications)
}
