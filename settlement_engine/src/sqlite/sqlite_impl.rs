//! `SqliteDatabase` is a concrete implementation of a settlement engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module. Counters and product stock are only ever mutated through SQLite's transactional write lock; there are no
//! application-level locks anywhere, so multiple server processes can safely share one database file.

use std::{fmt::Debug, time::Duration};

use log::*;
use sqlx::SqlitePool;

use super::db::{carts, counters, coupons, is_busy_settlement, new_pool, notifications, orders, products, settlements};
use crate::{
    db_types::{
        CartItem,
        Coupon,
        CouponUsage,
        NewCoupon,
        NewNotification,
        NewOrderActivity,
        NewProduct,
        Notification,
        Order,
        OrderActivity,
        OrderItem,
        OrderNumber,
        Product,
        Settlement,
    },
    traits::{
        CatalogManagement,
        CouponStore,
        OrderManagement,
        SequenceAllocation,
        SettlementCommit,
        SettlementDatabase,
        SettlementError,
    },
};

/// How many times a sequence allocation is retried on a write-write conflict before giving up.
const MAX_SEQUENCE_ATTEMPTS: u32 = 5;
/// How many times the settlement commit is retried on a write-write conflict before giving up.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(25 * u64::from(attempt))
}

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SettlementError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn try_commit(&self, commit: &SettlementCommit) -> Result<Vec<Order>, SettlementError> {
        let mut tx = self.pool.begin().await?;
        let numbers: Vec<String> = commit.orders.iter().map(|o| o.order_number.as_str().to_string()).collect();
        settlements::insert_settlement(
            &commit.gateway_payment_id,
            &commit.gateway_order_id,
            &commit.customer_id,
            &numbers,
            &mut tx,
        )
        .await?;
        let mut created = Vec::with_capacity(commit.orders.len());
        for draft in &commit.orders {
            let order = orders::insert_order(draft.clone(), &mut tx).await?;
            for item in &draft.items {
                products::decrement_stock(item.product_id, item.quantity, &mut tx).await?;
            }
            created.push(order);
        }
        carts::clear_cart(&commit.customer_id, &mut tx).await?;
        if let Some(redemption) = &commit.coupon {
            coupons::redeem_coupon(redemption.coupon_id, &mut tx).await?;
            if let Some(first) = created.first() {
                coupons::insert_usage(
                    redemption.coupon_id,
                    &commit.customer_id,
                    first.id,
                    redemption.discount,
                    &mut tx,
                )
                .await?;
            }
        }
        tx.commit().await?;
        Ok(created)
    }
}

impl SequenceAllocation for SqliteDatabase {
    async fn allocate_sequence(&self, name: &str) -> Result<i64, SettlementError> {
        for attempt in 1..=MAX_SEQUENCE_ATTEMPTS {
            let result = async {
                let mut tx = self.pool.begin().await.map_err(SettlementError::from)?;
                let value = counters::next_in_sequence(name, &mut tx).await?;
                tx.commit().await.map_err(SettlementError::from)?;
                Ok::<i64, SettlementError>(value)
            }
            .await;
            match result {
                Ok(value) => return Ok(value),
                Err(e) if is_busy_settlement(&e) => {
                    debug!("🔢️ Counter [{name}] is contended (attempt {attempt}/{MAX_SEQUENCE_ATTEMPTS}). {e}");
                    tokio::time::sleep(backoff(attempt)).await;
                },
                Err(e) => return Err(e),
            }
        }
        warn!("🔢️ Counter [{name}] allocation abandoned after {MAX_SEQUENCE_ATTEMPTS} attempts");
        Err(SettlementError::AllocationConflict(name.to_string()))
    }
}

impl CouponStore for SqliteDatabase {
    async fn fetch_coupon_by_code(&self, code: &str) -> Result<Option<Coupon>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        coupons::fetch_coupon_by_code(code, &mut conn).await
    }

    async fn insert_coupon(&self, coupon: NewCoupon) -> Result<Coupon, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        coupons::insert_coupon(coupon, &mut conn).await
    }

    async fn fetch_coupon_usage(&self, coupon_id: i64) -> Result<Vec<CouponUsage>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        coupons::fetch_usage(coupon_id, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(product_id, &mut conn).await
    }

    async fn add_cart_item(&self, user_id: &str, item: CartItem) -> Result<(), SettlementError> {
        let mut conn = self.pool.acquire().await?;
        carts::add_cart_item(user_id, item, &mut conn).await
    }

    async fn fetch_cart_items(&self, user_id: &str) -> Result<Vec<CartItem>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_cart_items(user_id, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_number(number, &mut conn).await
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_items(order_id, &mut conn).await
    }

    async fn fetch_order_activity(&self, order_id: i64) -> Result<Vec<OrderActivity>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_activity(order_id, &mut conn).await
    }

    async fn append_order_activity(
        &self,
        order_id: i64,
        entry: NewOrderActivity,
    ) -> Result<OrderActivity, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_activity(order_id, entry, &mut conn).await
    }

    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        notifications::insert_notification(notification, &mut conn).await
    }

    async fn fetch_notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        notifications::fetch_for_user(user_id, &mut conn).await
    }
}

impl SettlementDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_settlement_by_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<Settlement>, SettlementError> {
        let mut conn = self.pool.acquire().await?;
        settlements::fetch_by_payment_id(gateway_payment_id, &mut conn).await
    }

    async fn commit_settlement(&self, commit: SettlementCommit) -> Result<Vec<Order>, SettlementError> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            match self.try_commit(&commit).await {
                Ok(orders) => {
                    debug!(
                        "🧾️ Settlement of gateway payment [{}] committed: {} orders",
                        commit.gateway_payment_id,
                        orders.len()
                    );
                    return Ok(orders);
                },
                Err(e) if is_busy_settlement(&e) => {
                    debug!(
                        "🧾️ Settlement commit for [{}] hit a write conflict (attempt {attempt}/{MAX_COMMIT_ATTEMPTS}). {e}",
                        commit.gateway_payment_id
                    );
                    tokio::time::sleep(backoff(attempt)).await;
                },
                Err(e) => return Err(e),
            }
        }
        warn!(
            "🧾️ Settlement commit for [{}] abandoned after {MAX_COMMIT_ATTEMPTS} attempts",
            commit.gateway_payment_id
        );
        Err(SettlementError::CommitConflict(format!(
            "gateway payment {} could not be committed",
            commit.gateway_payment_id
        )))
    }

    async fn close(&mut self) -> Result<(), SettlementError> {
        self.pool.close().await;
        Ok(())
    }
}
