use chrono::Utc;
use log::*;

use crate::{
    api::errors::CouponApiError,
    coupons::{check_coupon, normalize_code},
    db_types::{Coupon, Money},
    traits::CouponStore,
};

#[derive(Debug, Clone)]
pub struct CouponCheck {
    pub coupon: Coupon,
    pub discount: Money,
}

/// `CouponApi` exposes coupon validation on its own, for the storefront to price a cart before checkout. It never
/// consumes a coupon; redemption happens inside the settlement commit.
pub struct CouponApi<B> {
    db: B,
}

impl<B> CouponApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CouponApi<B>
where B: CouponStore
{
    /// Validates `code` for the given user and order total, returning the coupon and the discount it would grant.
    pub async fn validate(&self, code: &str, user_id: &str, order_total: Money) -> Result<CouponCheck, CouponApiError> {
        let normalized = normalize_code(code);
        let coupon = self.db.fetch_coupon_by_code(&normalized).await?;
        let discount = check_coupon(coupon.as_ref(), user_id, order_total, Utc::now())?;
        debug!("🎟️ Coupon [{normalized}] validated for {user_id}: discount {discount} on {order_total}");
        // check_coupon only succeeds when the coupon exists
        let coupon = coupon.ok_or(crate::coupons::CouponError::NotFound)?;
        Ok(CouponCheck { coupon, discount })
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
