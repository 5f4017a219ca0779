//! The fee engine.
//!
//! Pure, deterministic money math with no I/O. Every derived fee is rounded half-up to the nearest minor unit
//! independently, before any summation, so the same inputs always produce the same breakdown to the cent.

use serde::{Deserialize, Serialize};

use crate::db_types::{DeliveryOption, Money};

pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(100_000);
pub const DEFAULT_FLAT_DELIVERY_FEE: Money = Money::from_cents(4_000);
/// 5% customer service fee, in basis points.
pub const DEFAULT_SERVICE_FEE_BPS: u32 = 500;
/// 2% vendor processing fee, in basis points.
pub const DEFAULT_PROCESSING_FEE_BPS: u32 = 200;

/// The configured fee parameters. Rates are carried in basis points so that fee math stays in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub free_shipping_threshold: Money,
    pub flat_delivery_fee: Money,
    pub service_fee_bps: u32,
    pub processing_fee_bps: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_delivery_fee: DEFAULT_FLAT_DELIVERY_FEE,
            service_fee_bps: DEFAULT_SERVICE_FEE_BPS,
            processing_fee_bps: DEFAULT_PROCESSING_FEE_BPS,
        }
    }
}

/// The full monetary breakdown for one vendor group.
///
/// Invariants, exact in minor units:
/// * `total_charged = subtotal + delivery_fee + customer_service_fee - discount`
/// * `vendor_payout + vendor_processing_fee + discount = subtotal`
/// * `platform_revenue = customer_service_fee + vendor_processing_fee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    pub delivery_fee: Money,
    pub customer_service_fee: Money,
    pub vendor_processing_fee: Money,
    pub total_charged: Money,
    pub vendor_payout: Money,
    pub platform_revenue: Money,
}

/// Computes the fee breakdown for a single vendor group.
///
/// Callers must supply `subtotal >= 0` and `0 <= discount <= subtotal`; the coupon engine enforces the discount cap
/// before this function is reached.
pub fn calculate_fees(
    subtotal: Money,
    delivery_option: DeliveryOption,
    discount: Money,
    schedule: &FeeSchedule,
) -> FeeBreakdown {
    debug_assert!(!subtotal.is_negative());
    debug_assert!(!discount.is_negative() && discount <= subtotal);
    let delivery_fee = match delivery_option {
        DeliveryOption::Pickup => Money::default(),
        DeliveryOption::Delivery if subtotal >= schedule.free_shipping_threshold => Money::default(),
        DeliveryOption::Delivery => schedule.flat_delivery_fee,
    };
    let customer_service_fee = subtotal.apply_bps(schedule.service_fee_bps);
    let vendor_processing_fee = (subtotal - discount).apply_bps(schedule.processing_fee_bps);
    let total_charged = subtotal + delivery_fee + customer_service_fee - discount;
    let vendor_payout = subtotal - vendor_processing_fee - discount;
    let platform_revenue = customer_service_fee + vendor_processing_fee;
    FeeBreakdown {
        subtotal,
        discount,
        delivery_fee,
        customer_service_fee,
        vendor_processing_fee,
        total_charged,
        vendor_payout,
        platform_revenue,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn schedule() -> FeeSchedule {
        FeeSchedule {
            free_shipping_threshold: Money::from_whole(1000),
            flat_delivery_fee: Money::from_whole(40),
            service_fee_bps: 500,
            processing_fee_bps: 200,
        }
    }

    #[test]
    fn free_shipping_above_threshold() {
        // subtotal=1200, threshold=1000 -> free delivery
        let fees = calculate_fees(Money::from_whole(1200), DeliveryOption::Delivery, Money::default(), &schedule());
        assert_eq!(fees.delivery_fee, Money::default());
        assert_eq!(fees.customer_service_fee, Money::from_whole(60));
        assert_eq!(fees.vendor_processing_fee, Money::from_whole(24));
        assert_eq!(fees.total_charged, Money::from_whole(1260));
        assert_eq!(fees.vendor_payout, Money::from_whole(1176));
        assert_eq!(fees.platform_revenue, Money::from_whole(84));
    }

    #[test]
    fn flat_fee_below_threshold() {
        let fees = calculate_fees(Money::from_whole(999), DeliveryOption::Delivery, Money::default(), &schedule());
        assert_eq!(fees.delivery_fee, Money::from_whole(40));
        let at_threshold =
            calculate_fees(Money::from_whole(1000), DeliveryOption::Delivery, Money::default(), &schedule());
        assert_eq!(at_threshold.delivery_fee, Money::default());
    }

    #[test]
    fn pickup_never_charges_delivery() {
        let fees = calculate_fees(Money::from_whole(10), DeliveryOption::Pickup, Money::default(), &schedule());
        assert_eq!(fees.delivery_fee, Money::default());
    }

    #[test]
    fn total_charged_never_below_subtotal_without_discount() {
        for cents in [0i64, 1, 99, 12_345, 99_999, 100_000, 5_000_000] {
            let subtotal = Money::from_cents(cents);
            let fees = calculate_fees(subtotal, DeliveryOption::Delivery, Money::default(), &schedule());
            assert!(fees.total_charged >= subtotal, "subtotal {subtotal} charged {}", fees.total_charged);
        }
    }

    #[test]
    fn payout_identity_is_exact() {
        for (cents, discount) in [(0i64, 0i64), (1, 0), (999, 100), (12_345, 345), (100_001, 100_001), (7_777, 1)] {
            let subtotal = Money::from_cents(cents);
            let discount = Money::from_cents(discount);
            let fees = calculate_fees(subtotal, DeliveryOption::Delivery, discount, &schedule());
            assert_eq!(fees.vendor_payout + fees.vendor_processing_fee + fees.discount, subtotal);
        }
    }

    #[test]
    fn fees_round_half_up_independently() {
        // 5% of 0.31 = 1.55c -> 2c; 2% of 0.31 = 0.62c -> 1c
        let fees = calculate_fees(Money::from_cents(31), DeliveryOption::Pickup, Money::default(), &schedule());
        assert_eq!(fees.customer_service_fee, Money::from_cents(2));
        assert_eq!(fees.vendor_processing_fee, Money::from_cents(1));
        // the processing fee applies to the discounted amount
        let discounted = calculate_fees(Money::from_cents(1000), DeliveryOption::Pickup, Money::from_cents(500), &schedule());
        assert_eq!(discounted.vendor_processing_fee, Money::from_cents(10));
    }
}
