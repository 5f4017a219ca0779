use crate::db_types::Order;

/// Emitted once per order created by a successful settlement commit. Subscribers run strictly after the commit, so
/// nothing they do can affect the already-committed state.
#[derive(Debug, Clone)]
pub struct OrderCreatedEvent {
    pub order: Order,
    /// Contact details captured from the settlement request, for notification delivery.
    pub customer_email: String,
    pub customer_phone: String,
}

impl OrderCreatedEvent {
    pub fn new(order: Order, customer_email: String, customer_phone: String) -> Self {
        Self { order, customer_email, customer_phone }
    }
}
