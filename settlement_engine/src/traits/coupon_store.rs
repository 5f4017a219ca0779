use crate::{
    db_types::{Coupon, CouponUsage, NewCoupon},
    traits::SettlementError,
};

/// Storage for coupon definitions and their redemption audit trail.
#[allow(async_fn_in_trait)]
pub trait CouponStore: Clone {
    /// Fetches a coupon by its normalized code (see [`crate::coupons::normalize_code`]). Lookup is case-insensitive
    /// because codes are stored normalized.
    async fn fetch_coupon_by_code(&self, code: &str) -> Result<Option<Coupon>, SettlementError>;

    async fn insert_coupon(&self, coupon: NewCoupon) -> Result<Coupon, SettlementError>;

    /// The immutable redemption records for a coupon, oldest first.
    async fn fetch_coupon_usage(&self, coupon_id: i64) -> Result<Vec<CouponUsage>, SettlementError>;
}
