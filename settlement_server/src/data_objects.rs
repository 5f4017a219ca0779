use std::fmt::Display;

use serde::{Deserialize, Serialize};
use settlement_engine::{
    db_types::{
        CartItem,
        Coupon,
        DeliveryOption,
        DiscountType,
        Money,
        Order,
        OrderActivity,
        OrderItem,
        ShippingAddress,
    },
    NewSettlement,
};

/// The body of the gateway verification callback. The signature covers `gatewayOrderId|gatewayPaymentId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerificationRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
    pub user_id: String,
    pub cart_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub delivery_option: DeliveryOption,
    pub payment_method: String,
    pub phone_number: String,
    pub email: String,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

impl From<PaymentVerificationRequest> for NewSettlement {
    fn from(req: PaymentVerificationRequest) -> Self {
        NewSettlement {
            customer_id: req.user_id,
            gateway_order_id: req.gateway_order_id,
            gateway_payment_id: req.gateway_payment_id,
            cart_items: req.cart_items,
            shipping_address: req.shipping_address,
            delivery_option: req.delivery_option,
            payment_method: req.payment_method,
            phone_number: req.phone_number,
            email: req.email,
            coupon_code: req.coupon_code,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSuccess {
    pub success: bool,
    pub order_numbers: Vec<String>,
}

impl SettlementSuccess {
    pub fn new(order_numbers: Vec<String>) -> Self {
        Self { success: true, order_numbers }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidationRequest {
    pub code: String,
    pub user_id: String,
    pub order_total: Money,
}

/// The coupon fields the storefront is allowed to see. Internals like the usage counters and the user restriction
/// stay server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_order_amount: Money,
}

impl From<Coupon> for CouponSummary {
    fn from(c: Coupon) -> Self {
        Self {
            code: c.code,
            discount_type: c.discount_type,
            discount_value: c.discount_value,
            min_order_amount: c.min_order_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidationSuccess {
    pub success: bool,
    pub coupon: CouponSummary,
    pub discount_amount: Money,
}

/// A structured failure body: `{"success": false, "error": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFailure {
    pub success: bool,
    pub error: String,
}

impl JsonFailure {
    pub fn new<S: Display>(error: S) -> Self {
        Self { success: false, error: error.to_string() }
    }
}

/// A settled order with its line items and audit trail, for the read-only order view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub activity: Vec<OrderActivity>,
}
