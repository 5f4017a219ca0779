use thiserror::Error;

use crate::{coupons::CouponError, traits::SettlementError};

#[derive(Debug, Clone, Error)]
pub enum CouponApiError {
    /// The coupon failed one of the eligibility rules. This is a user-correctable outcome, not a fault.
    #[error("{0}")]
    Rejected(#[from] CouponError),
    #[error("Internal error while validating coupon: {0}")]
    Database(String),
}

impl From<SettlementError> for CouponApiError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::CouponRejected(c) => CouponApiError::Rejected(c),
            other => CouponApiError::Database(other.to_string()),
        }
    }
}
