use thiserror::Error;

use crate::{
    coupons::CouponError,
    db_types::{Money, NewOrder, Order, OrderNumber, Settlement},
    traits::{CatalogManagement, CouponStore, OrderManagement, SequenceAllocation},
};

/// The coupon side of a settlement commit: which coupon to consume and the total discount it granted across the
/// whole cart.
#[derive(Debug, Clone)]
pub struct CouponRedemption {
    pub coupon_id: i64,
    pub discount: Money,
}

/// Everything the settlement commit must apply as one atomic unit.
#[derive(Debug, Clone)]
pub struct SettlementCommit {
    pub customer_id: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub orders: Vec<NewOrder>,
    pub coupon: Option<CouponRedemption>,
}

/// This trait defines the highest level of behaviour for backends supporting the settlement engine.
///
/// This behaviour includes:
/// * Minting unique sequence values for order numbers.
/// * Looking up coupons and recording their redemption.
/// * The atomic settlement commit itself.
/// * Read access to settled orders and the idempotency records that guard against duplicate gateway callbacks.
#[allow(async_fn_in_trait)]
pub trait SettlementDatabase:
    Clone + SequenceAllocation + CouponStore + CatalogManagement + OrderManagement
{
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Looks up a previously committed settlement by the gateway's payment id.
    async fn fetch_settlement_by_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<Settlement>, SettlementError>;

    /// Applies the full set of settlement writes as a single atomic unit:
    /// 1. inserts the idempotency record (unique on the gateway payment id),
    /// 2. inserts every order draft, its item rows, and an `order_created` audit entry,
    /// 3. decrements stock on every referenced product by its ordered quantity (no clamp at zero, no availability
    ///    re-check; a missing product row is the only failure),
    /// 4. clears the buyer's cart,
    /// 5. finalizes the coupon redemption with a limit-guarded `used_count` increment and a usage record.
    ///
    /// If the unit cannot be fully applied, nothing is visible to subsequent reads. A duplicate gateway payment id
    /// surfaces as [`SettlementError::DuplicateSettlement`] so the caller can replay the original result.
    ///
    /// Returns the created orders, in the same sequence as the drafts.
    async fn commit_settlement(&self, commit: SettlementCommit) -> Result<Vec<Order>, SettlementError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), SettlementError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Sequence allocation for '{0}' could not complete within the retry budget")]
    AllocationConflict(String),
    #[error("The settlement commit could not complete within the retry budget. {0}")]
    CommitConflict(String),
    #[error("A settlement already exists for gateway payment {0}")]
    DuplicateSettlement(String),
    #[error("The referenced product (id {0}) does not exist")]
    ProductNotFound(i64),
    #[error("The cart is empty, so there is nothing to settle")]
    EmptyCart,
    #[error("{0}")]
    CouponRejected(#[from] CouponError),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderNumber),
}

impl From<sqlx::Error> for SettlementError {
    fn from(e: sqlx::Error) -> Self {
        SettlementError::DatabaseError(e.to_string())
    }
}
