use log::debug;
use sqlx::SqliteConnection;

use crate::{
    coupons::{normalize_code, CouponError},
    db_types::{Coupon, CouponUsage, Money, NewCoupon},
    traits::SettlementError,
};

/// Fetches a coupon by code. Codes are stored normalized (see [`normalize_code`]), which is what makes the lookup
/// case-insensitive.
pub async fn fetch_coupon_by_code(
    code: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Coupon>, SettlementError> {
    let coupon = sqlx::query_as("SELECT * FROM coupons WHERE code = $1")
        .bind(normalize_code(code))
        .fetch_optional(conn)
        .await?;
    Ok(coupon)
}

pub async fn insert_coupon(coupon: NewCoupon, conn: &mut SqliteConnection) -> Result<Coupon, SettlementError> {
    let coupon = sqlx::query_as(
        r#"
            INSERT INTO coupons (
                code, discount_type, discount_value, max_discount, min_order_amount,
                valid_from, valid_until, usage_limit, restricted_to, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(normalize_code(&coupon.code))
    .bind(coupon.discount_type)
    .bind(coupon.discount_value)
    .bind(coupon.max_discount)
    .bind(coupon.min_order_amount)
    .bind(coupon.valid_from)
    .bind(coupon.valid_until)
    .bind(coupon.usage_limit)
    .bind(coupon.restricted_to)
    .bind(coupon.is_active)
    .fetch_one(conn)
    .await?;
    Ok(coupon)
}

/// Finalizes a redemption: increments `used_count`, guarded against the usage limit so that concurrent checkouts
/// cannot consume a coupon past it. A guard miss aborts the enclosing transaction with `LimitReached`.
pub async fn redeem_coupon(coupon_id: i64, conn: &mut SqliteConnection) -> Result<(), SettlementError> {
    let result = sqlx::query(
        r#"
            UPDATE coupons SET used_count = used_count + 1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND (usage_limit = 0 OR used_count < usage_limit);
        "#,
    )
    .bind(coupon_id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(SettlementError::CouponRejected(CouponError::LimitReached));
    }
    debug!("🎟️ Coupon {coupon_id} redeemed");
    Ok(())
}

/// Records the immutable audit row for one redemption.
pub async fn insert_usage(
    coupon_id: i64,
    user_id: &str,
    order_id: i64,
    discount: Money,
    conn: &mut SqliteConnection,
) -> Result<(), SettlementError> {
    sqlx::query("INSERT INTO coupon_usage (coupon_id, user_id, order_id, discount) VALUES ($1, $2, $3, $4)")
        .bind(coupon_id)
        .bind(user_id)
        .bind(order_id)
        .bind(discount)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_usage(coupon_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CouponUsage>, SettlementError> {
    let usage = sqlx::query_as("SELECT * FROM coupon_usage WHERE coupon_id = $1 ORDER BY id ASC")
        .bind(coupon_id)
        .fetch_all(conn)
        .await?;
    Ok(usage)
}
