use crate::db_types::{CartItem, DeliveryOption, Money, Order, ShippingAddress};

/// A verified payment plus everything needed to settle it. By the time one of these is constructed, the payment
/// verification gate has already authenticated the gateway callback.
#[derive(Debug, Clone)]
pub struct NewSettlement {
    pub customer_id: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub cart_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub delivery_option: DeliveryOption,
    pub payment_method: String,
    pub phone_number: String,
    pub email: String,
    pub coupon_code: Option<String>,
}

impl NewSettlement {
    pub fn cart_subtotal(&self) -> Money {
        self.cart_items.iter().map(CartItem::line_total).sum()
    }
}

/// The outcome of a successful settlement: every order created, in vendor-group order.
#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    pub order_numbers: Vec<String>,
    pub orders: Vec<Order>,
    /// True when this receipt replays an earlier settlement for the same gateway payment id (a duplicate callback)
    /// rather than reporting fresh writes.
    pub replayed: bool,
}
