use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    api::settlement_objects::{NewSettlement, SettlementReceipt},
    coupons::{check_coupon, normalize_code},
    db_types::{NewOrder, Order, OrderNumber, Settlement},
    events::{EventProducers, OrderCreatedEvent},
    fees::{calculate_fees, FeeSchedule},
    helpers::{order_number, ORDER_SEQUENCE},
    splitter::{apportion_discount, split_by_vendor},
    traits::{CouponRedemption, SettlementCommit, SettlementDatabase, SettlementError},
};

/// `SettlementApi` is the primary API for turning a verified payment into durable order records.
///
/// The pipeline it drives: split the cart into vendor groups, validate the coupon against the cart total, apportion
/// the discount, price each group through the fee engine, mint an order number per group, commit everything as one
/// atomic unit, then emit best-effort side effects for each created order.
pub struct SettlementApi<B> {
    db: B,
    fees: FeeSchedule,
    producers: EventProducers,
}

impl<B> Debug for SettlementApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettlementApi")
    }
}

impl<B> SettlementApi<B> {
    pub fn new(db: B, fees: FeeSchedule, producers: EventProducers) -> Self {
        Self { db, fees, producers }
    }
}

impl<B> SettlementApi<B>
where B: SettlementDatabase
{
    /// Settles a verified payment.
    ///
    /// The caller always receives either the full list of created order numbers or a single error; there is no
    /// partial outcome. A duplicate call for a gateway payment id that has already settled replays the original
    /// order numbers instead of settling twice.
    pub async fn settle(&self, settlement: NewSettlement) -> Result<SettlementReceipt, SettlementError> {
        if settlement.cart_items.is_empty() {
            return Err(SettlementError::EmptyCart);
        }
        if let Some(prior) = self.db.fetch_settlement_by_payment_id(&settlement.gateway_payment_id).await? {
            info!(
                "🧾️ Gateway payment [{}] has already been settled. Replaying the original result.",
                settlement.gateway_payment_id
            );
            return self.replay_receipt(prior).await;
        }
        let cart_subtotal = settlement.cart_subtotal();
        let coupon = match &settlement.coupon_code {
            Some(code) => {
                let normalized = normalize_code(code);
                let coupon = self.db.fetch_coupon_by_code(&normalized).await?;
                let discount = check_coupon(coupon.as_ref(), &settlement.customer_id, cart_subtotal, Utc::now())?;
                trace!("🎟️ Coupon [{normalized}] grants {discount} off a {cart_subtotal} cart");
                coupon.map(|c| (c, discount))
            },
            None => None,
        };
        let total_discount = coupon.as_ref().map(|(_, discount)| *discount).unwrap_or_default();

        let groups = split_by_vendor(&settlement.cart_items);
        let discounts = apportion_discount(total_discount, &groups);
        let mut drafts = Vec::with_capacity(groups.len());
        for (group, discount) in groups.iter().zip(discounts) {
            let fees = calculate_fees(group.subtotal(), settlement.delivery_option, discount, &self.fees);
            let seq = self.db.allocate_sequence(ORDER_SEQUENCE).await?;
            let number = order_number(seq);
            trace!("🧾️ Vendor [{}] draft {number}: charging {}", group.vendor_id, fees.total_charged);
            drafts.push(NewOrder {
                order_number: number,
                customer_id: settlement.customer_id.clone(),
                vendor_id: group.vendor_id.clone(),
                items: group.items.clone(),
                fees,
                delivery_option: settlement.delivery_option,
                payment_method: settlement.payment_method.clone(),
                shipping_address: settlement.shipping_address.clone(),
                gateway_order_id: settlement.gateway_order_id.clone(),
                gateway_payment_id: settlement.gateway_payment_id.clone(),
            });
        }
        let commit = SettlementCommit {
            customer_id: settlement.customer_id.clone(),
            gateway_order_id: settlement.gateway_order_id.clone(),
            gateway_payment_id: settlement.gateway_payment_id.clone(),
            orders: drafts,
            coupon: coupon.map(|(c, _)| CouponRedemption { coupon_id: c.id, discount: total_discount }),
        };
        let orders = match self.db.commit_settlement(commit).await {
            Ok(orders) => orders,
            Err(SettlementError::DuplicateSettlement(pid)) => {
                // Lost the race against a concurrent callback for the same payment. The winner's writes are durable.
                info!("🧾️ Gateway payment [{pid}] was settled concurrently. Replaying the winner's result.");
                let prior = self.db.fetch_settlement_by_payment_id(&pid).await?.ok_or_else(|| {
                    SettlementError::DatabaseError(format!("Settlement for payment {pid} vanished after a conflict"))
                })?;
                return self.replay_receipt(prior).await;
            },
            Err(e) => return Err(e),
        };
        self.call_order_created_hook(&orders, &settlement).await;
        let numbers: Vec<String> = orders.iter().map(|o| o.order_number.as_str().to_string()).collect();
        info!(
            "🧾️ Settlement of gateway payment [{}] complete. {} orders created: {}",
            settlement.gateway_payment_id,
            orders.len(),
            numbers.join(", ")
        );
        Ok(SettlementReceipt { order_numbers: numbers, orders, replayed: false })
    }

    async fn replay_receipt(&self, prior: Settlement) -> Result<SettlementReceipt, SettlementError> {
        let order_numbers = prior.order_numbers.0.clone();
        let mut orders = Vec::with_capacity(order_numbers.len());
        for number in &order_numbers {
            if let Some(order) = self.db.fetch_order_by_number(&OrderNumber::from(number.clone())).await? {
                orders.push(order);
            }
        }
        Ok(SettlementReceipt { order_numbers, orders, replayed: true })
    }

    async fn call_order_created_hook(&self, orders: &[Order], settlement: &NewSettlement) {
        for emitter in &self.producers.order_created_producer {
            debug!("📬️ Notifying order created hook subscribers");
            for order in orders {
                let event = OrderCreatedEvent::new(
                    order.clone(),
                    settlement.email.clone(),
                    settlement.phone_number.clone(),
                );
                emitter.publish_event(event).await;
            }
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
