use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    types::Json,
    FromRow,
    Type,
};
use thiserror::Error;

pub use osg_common::Money;

use crate::fees::FeeBreakdown;

//--------------------------------------    OrderNumber      ---------------------------------------------------------
/// The human-readable order number minted by the sequence allocator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderNumber(pub String);

impl FromStr for OrderNumber {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------  OrderStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created and is awaiting vendor confirmation.
    Pending,
    /// The vendor has accepted the order and is preparing it.
    Processing,
    /// The order has been handed to the courier.
    Shipped,
    /// The order has been delivered. Terminal.
    Delivered,
    /// The order has been cancelled. Terminal.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Processing => write!(f, "Processing"),
            OrderStatusType::Shipped => write!(f, "Shipped"),
            OrderStatusType::Delivered => write!(f, "Delivered"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------   PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

//--------------------------------------   DeliveryOption    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOption {
    Delivery,
    Pickup,
}

impl Display for DeliveryOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryOption::Delivery => write!(f, "delivery"),
            DeliveryOption::Pickup => write!(f, "pickup"),
        }
    }
}

//--------------------------------------    DiscountType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum DiscountType {
    /// The discount value is a whole-number percentage of the order total.
    Percentage,
    /// The discount value is an absolute amount in minor currency units.
    Fixed,
}

//--------------------------------------  ShippingAddress    ---------------------------------------------------------
/// A shipping address, snapshotted into the order at settlement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
}

//--------------------------------------      CartItem       ---------------------------------------------------------
/// A product snapshot embedded by value in the cart, and later in the order. It is not a live reference to the
/// product record, so historical orders are immune to later product edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub price: Money,
    pub stock_at_add: i64,
    pub quantity: i64,
    pub vendor_id: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub vendor_id: String,
    pub name: String,
    pub price: Money,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub vendor_id: String,
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_number: OrderNumber,
    pub customer_id: String,
    pub vendor_id: String,
    pub subtotal: Money,
    pub discount: Money,
    pub delivery_fee: Money,
    pub service_fee: Money,
    pub processing_fee: Money,
    pub total: Money,
    pub vendor_payout: Money,
    pub status: OrderStatusType,
    pub payment_status: PaymentStatus,
    pub delivery_option: DeliveryOption,
    pub payment_method: String,
    pub shipping_address: Json<ShippingAddress>,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub vendor_id: String,
    pub images: Json<Vec<String>>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
/// An order draft produced by the splitter for one vendor group. Drafts only become durable inside
/// [`crate::traits::SettlementDatabase::commit_settlement`].
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub customer_id: String,
    pub vendor_id: String,
    pub items: Vec<CartItem>,
    pub fees: FeeBreakdown,
    pub delivery_option: DeliveryOption,
    pub payment_method: String,
    pub shipping_address: ShippingAddress,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
}

impl Display for NewOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {} for vendor [{}]: {} items, total {}",
            self.order_number,
            self.vendor_id,
            self.items.len(),
            self.fees.total_charged
        )
    }
}

//--------------------------------------   OrderActivity     ---------------------------------------------------------
/// One append-only entry in an order's audit trail. Entries are never edited or removed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderActivity {
    pub id: i64,
    pub order_id: i64,
    pub action: String,
    pub description: String,
    pub performed_by: String,
    pub performed_by_role: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrderActivity {
    pub action: String,
    pub description: String,
    pub performed_by: String,
    pub performed_by_role: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

impl NewOrderActivity {
    /// An entry recorded by the pipeline itself rather than a human actor.
    pub fn system<S1: Into<String>, S2: Into<String>>(action: S1, description: S2) -> Self {
        Self {
            action: action.into(),
            description: description.into(),
            performed_by: "system".to_string(),
            performed_by_role: "system".to_string(),
            previous_value: None,
            new_value: None,
        }
    }

    pub fn with_transition<S1: Into<String>, S2: Into<String>>(mut self, previous: S1, new: S2) -> Self {
        self.previous_value = Some(previous.into());
        self.new_value = Some(new.into());
        self
    }
}

//--------------------------------------       Coupon        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub max_discount: Option<Money>,
    pub min_order_amount: Money,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: i64,
    pub used_count: i64,
    pub restricted_to: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub max_discount: Option<Money>,
    pub min_order_amount: Money,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: i64,
    pub restricted_to: Option<String>,
    pub is_active: bool,
}

//--------------------------------------    CouponUsage      ---------------------------------------------------------
/// An immutable record of one coupon redemption. Together with `Coupon::used_count` it forms the audit trail
/// reconciling redemptions against the discounts actually granted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponUsage {
    pub id: i64,
    pub coupon_id: i64,
    pub user_id: String,
    pub order_id: i64,
    pub discount: Money,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------     Settlement      ---------------------------------------------------------
/// The idempotency record for one settled payment. The unique `gateway_payment_id` column is what makes duplicate
/// gateway callbacks replay the original result instead of settling twice.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: i64,
    pub gateway_payment_id: String,
    pub gateway_order_id: String,
    pub customer_id: String,
    pub order_numbers: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    Notification     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub order_number: OrderNumber,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub order_number: OrderNumber,
    pub kind: String,
    pub title: String,
    pub body: String,
}
