//! Coupon eligibility rules and discount arithmetic.
//!
//! The functions in this module are pure: they take an already-fetched [`Coupon`] record and a clock value, and
//! decide whether the coupon applies and what it is worth. Nothing in here mutates `used_count` — redemption is
//! finalized only inside the settlement commit, in the same atomic unit as order creation, so a coupon can never be
//! validated-but-not-consumed or consumed past its limit under concurrent checkouts.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{Coupon, DiscountType, Money};

/// Why a coupon was rejected. These are user-correctable validation outcomes, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Coupon code not found")]
    NotFound,
    #[error("This coupon is no longer active")]
    Inactive,
    #[error("This coupon is not valid yet")]
    NotYetValid,
    #[error("This coupon has expired")]
    Expired,
    #[error("This coupon has reached its usage limit")]
    LimitReached,
    #[error("This coupon is reserved for another customer")]
    UserRestricted,
    #[error("The order total must be at least {0} to use this coupon")]
    BelowMinimum(Money),
}

/// Normalizes a coupon code for case-insensitive lookup. Codes are stored in this form.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Runs the eligibility checks in order, short-circuiting on the first failure, and returns the discount the coupon
/// grants against `order_total`.
pub fn check_coupon(
    coupon: Option<&Coupon>,
    user_id: &str,
    order_total: Money,
    now: DateTime<Utc>,
) -> Result<Money, CouponError> {
    let coupon = coupon.ok_or(CouponError::NotFound)?;
    if !coupon.is_active {
        return Err(CouponError::Inactive);
    }
    if now < coupon.valid_from {
        return Err(CouponError::NotYetValid);
    }
    if now > coupon.valid_until {
        return Err(CouponError::Expired);
    }
    if coupon.usage_limit != 0 && coupon.used_count >= coupon.usage_limit {
        return Err(CouponError::LimitReached);
    }
    if let Some(user) = &coupon.restricted_to {
        if user != user_id {
            return Err(CouponError::UserRestricted);
        }
    }
    if order_total < coupon.min_order_amount {
        return Err(CouponError::BelowMinimum(coupon.min_order_amount));
    }
    Ok(discount_for(coupon, order_total))
}

/// The discount a coupon grants against the given order total: a half-up-rounded percentage or a fixed amount,
/// capped by `max_discount` when set, and always capped at the order total itself.
pub fn discount_for(coupon: &Coupon, order_total: Money) -> Money {
    let raw = match coupon.discount_type {
        DiscountType::Percentage => order_total.percent(coupon.discount_value),
        DiscountType::Fixed => Money::from_cents(coupon.discount_value),
    };
    let capped = match coupon.max_discount {
        Some(max) => raw.min(max),
        None => raw,
    };
    capped.min(order_total)
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;

    fn coupon() -> Coupon {
        let now = Utc::now();
        Coupon {
            id: 1,
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            max_discount: None,
            min_order_amount: Money::default(),
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            usage_limit: 0,
            used_count: 0,
            restricted_to: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_code("  save10 "), "SAVE10");
        assert_eq!(normalize_code("Save10"), "SAVE10");
    }

    #[test]
    fn missing_coupon_is_not_found() {
        assert_eq!(check_coupon(None, "u1", Money::from_whole(100), Utc::now()), Err(CouponError::NotFound));
    }

    #[test]
    fn inactive_beats_every_other_check() {
        let mut c = coupon();
        c.is_active = false;
        c.used_count = 5;
        c.usage_limit = 3;
        assert_eq!(check_coupon(Some(&c), "u1", Money::from_whole(100), Utc::now()), Err(CouponError::Inactive));
    }

    #[test]
    fn validity_window() {
        let c = coupon();
        let too_early = c.valid_from - Duration::hours(1);
        let too_late = c.valid_until + Duration::hours(1);
        assert_eq!(check_coupon(Some(&c), "u1", Money::from_whole(100), too_early), Err(CouponError::NotYetValid));
        assert_eq!(check_coupon(Some(&c), "u1", Money::from_whole(100), too_late), Err(CouponError::Expired));
    }

    #[test]
    fn usage_limit_reached() {
        let mut c = coupon();
        c.usage_limit = 3;
        c.used_count = 3;
        assert_eq!(check_coupon(Some(&c), "u1", Money::from_whole(100), Utc::now()), Err(CouponError::LimitReached));
        // a zero limit means unlimited
        c.usage_limit = 0;
        c.used_count = 1_000;
        assert!(check_coupon(Some(&c), "u1", Money::from_whole(100), Utc::now()).is_ok());
    }

    #[test]
    fn user_restriction() {
        let mut c = coupon();
        c.restricted_to = Some("alice".to_string());
        assert_eq!(check_coupon(Some(&c), "bob", Money::from_whole(100), Utc::now()), Err(CouponError::UserRestricted));
        assert!(check_coupon(Some(&c), "alice", Money::from_whole(100), Utc::now()).is_ok());
    }

    #[test]
    fn below_minimum_by_one_cent() {
        let mut c = coupon();
        c.min_order_amount = Money::from_whole(50);
        let just_short = Money::from_whole(50) - Money::from_cents(1);
        assert_eq!(
            check_coupon(Some(&c), "u1", just_short, Utc::now()),
            Err(CouponError::BelowMinimum(Money::from_whole(50)))
        );
        assert!(check_coupon(Some(&c), "u1", Money::from_whole(50), Utc::now()).is_ok());
    }

    #[test]
    fn percentage_discount_with_cap() {
        let mut c = coupon();
        c.discount_value = 10;
        assert_eq!(discount_for(&c, Money::from_whole(200)), Money::from_whole(20));
        c.max_discount = Some(Money::from_whole(15));
        assert_eq!(discount_for(&c, Money::from_whole(200)), Money::from_whole(15));
        // 10% of 0.05 = 0.5c, rounds half-up to 1c
        c.max_discount = None;
        assert_eq!(discount_for(&c, Money::from_cents(5)), Money::from_cents(1));
    }

    #[test]
    fn fixed_discount_caps_at_order_total() {
        let mut c = coupon();
        c.discount_type = DiscountType::Fixed;
        c.discount_value = 5_000;
        assert_eq!(discount_for(&c, Money::from_whole(100)), Money::from_whole(50));
        assert_eq!(discount_for(&c, Money::from_whole(20)), Money::from_whole(20));
    }
}
