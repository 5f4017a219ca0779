use crate::{
    db_types::{NewNotification, NewOrderActivity, Notification, Order, OrderActivity, OrderItem, OrderNumber},
    traits::SettlementError,
};

/// Read access to settled orders, plus the append-only writes that may happen after the commit (activity entries and
/// notification records).
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, SettlementError>;

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, SettlementError>;

    /// The order's audit trail, oldest entry first. Entries are append-only; there is no way to edit or remove one.
    async fn fetch_order_activity(&self, order_id: i64) -> Result<Vec<OrderActivity>, SettlementError>;

    fn append_order_activity(
        &self,
        order_id: i64,
        entry: NewOrderActivity,
    ) -> impl std::future::Future<Output = Result<OrderActivity, SettlementError>> + Send;

    fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> impl std::future::Future<Output = Result<Notification, SettlementError>> + Send;

    async fn fetch_notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, SettlementError>;
}
