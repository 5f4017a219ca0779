//! The order splitter.
//!
//! Partitions a multi-vendor cart into one group per vendor and apportions a cart-wide discount across the groups.
//! Grouping preserves the relative order of items and the first-seen order of vendors, which also fixes the order in
//! which order numbers are allocated: the first vendor group in the cart gets the lowest number.

use crate::db_types::{CartItem, Money};

/// The slice of a cart belonging to one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorGroup {
    pub vendor_id: String,
    pub items: Vec<CartItem>,
}

impl VendorGroup {
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// Groups cart items by vendor id, preserving the relative order of items and the first-seen order of vendors.
pub fn split_by_vendor(items: &[CartItem]) -> Vec<VendorGroup> {
    let mut groups: Vec<VendorGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.vendor_id == item.vendor_id) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(VendorGroup { vendor_id: item.vendor_id.clone(), items: vec![item.clone()] }),
        }
    }
    groups
}

/// Splits a cart-wide discount across vendor groups pro-rata by subtotal share.
///
/// Each group first receives the floor of its proportional share; the leftover minor units are then handed out one
/// at a time to the earliest groups that still have headroom, so the parts always sum exactly to `discount` and no
/// group's share exceeds its own subtotal.
pub fn apportion_discount(discount: Money, groups: &[VendorGroup]) -> Vec<Money> {
    let subtotals: Vec<i64> = groups.iter().map(|g| g.subtotal().value()).collect();
    let cart_total: i64 = subtotals.iter().sum();
    if discount.is_zero() || cart_total == 0 {
        return vec![Money::default(); groups.len()];
    }
    let discount = discount.value().min(cart_total);
    let mut shares: Vec<i64> = subtotals
        .iter()
        .map(|sub| {
            let share = i128::from(discount) * i128::from(*sub) / i128::from(cart_total);
            #[allow(clippy::cast_possible_truncation)]
            {
                share as i64
            }
        })
        .collect();
    let mut remainder = discount - shares.iter().sum::<i64>();
    while remainder > 0 {
        for (share, sub) in shares.iter_mut().zip(&subtotals) {
            if remainder == 0 {
                break;
            }
            if *share < *sub {
                *share += 1;
                remainder -= 1;
            }
        }
    }
    shares.into_iter().map(Money::from_cents).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn item(vendor: &str, product_id: i64, price: i64, quantity: i64) -> CartItem {
        CartItem {
            product_id,
            name: format!("product-{product_id}"),
            price: Money::from_cents(price),
            stock_at_add: 10,
            quantity,
            vendor_id: vendor.to_string(),
            images: vec![],
        }
    }

    #[test]
    fn grouping_preserves_first_seen_vendor_order() {
        let items = vec![item("b", 1, 100, 1), item("a", 2, 200, 1), item("b", 3, 300, 2), item("c", 4, 50, 1)];
        let groups = split_by_vendor(&items);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].vendor_id, "b");
        assert_eq!(groups[1].vendor_id, "a");
        assert_eq!(groups[2].vendor_id, "c");
        assert_eq!(groups[0].items.iter().map(|i| i.product_id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(groups[0].subtotal(), Money::from_cents(700));
    }

    #[test]
    fn single_vendor_gets_the_whole_discount() {
        let groups = split_by_vendor(&[item("a", 1, 1_000, 1)]);
        assert_eq!(apportion_discount(Money::from_cents(250), &groups), vec![Money::from_cents(250)]);
    }

    #[test]
    fn pro_rata_split_sums_exactly() {
        // subtotals 100 / 200 / 37; an awkward discount that does not divide evenly
        let groups = split_by_vendor(&[item("a", 1, 100, 1), item("b", 2, 200, 1), item("c", 3, 37, 1)]);
        let parts = apportion_discount(Money::from_cents(100), &groups);
        let total: Money = parts.iter().copied().sum();
        assert_eq!(total, Money::from_cents(100));
        for (part, group) in parts.iter().zip(&groups) {
            assert!(*part <= group.subtotal());
        }
        // the larger subtotal carries the larger share
        assert!(parts[1] > parts[0]);
    }

    #[test]
    fn full_discount_consumes_every_group() {
        let groups = split_by_vendor(&[item("a", 1, 100, 1), item("b", 2, 50, 1)]);
        let parts = apportion_discount(Money::from_cents(150), &groups);
        assert_eq!(parts, vec![Money::from_cents(100), Money::from_cents(50)]);
    }

    #[test]
    fn zero_discount_yields_zero_shares() {
        let groups = split_by_vendor(&[item("a", 1, 100, 1), item("b", 2, 50, 1)]);
        assert_eq!(apportion_discount(Money::default(), &groups), vec![Money::default(); 2]);
    }
}
