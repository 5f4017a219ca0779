use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

//--------------------------------------       Money         ---------------------------------------------------------
/// An amount of currency, carried as a count of minor units (cents).
///
/// All arithmetic is integer arithmetic. Rate application rounds half-up to the nearest minor unit, so fee
/// calculations are reproducible to the cent.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor currency units: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<u64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MoneyConversionError(format!("Value {} is too large to convert to Money", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// An amount expressed in whole currency units.
    pub const fn from_whole(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a rate given in basis points (1 bps = 0.01%), rounding half-up (half away from zero for negative
    /// amounts) to the nearest minor unit.
    pub fn apply_bps(&self, bps: u32) -> Self {
        let numerator = i128::from(self.0) * i128::from(bps);
        let rounded = if numerator >= 0 { (numerator + 5_000) / 10_000 } else { (numerator - 5_000) / 10_000 };
        #[allow(clippy::cast_possible_truncation)]
        Self(rounded as i64)
    }

    /// Takes a whole-number percentage of the amount, rounding half-up to the nearest minor unit.
    pub fn percent(&self, pct: i64) -> Self {
        self.apply_bps(u32::try_from(pct * 100).unwrap_or(0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Money::from_whole(12);
        let b = Money::from_cents(34);
        assert_eq!((a + b).value(), 1234);
        assert_eq!((a - b).value(), 1166);
        assert_eq!((-b).value(), -34);
        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.value(), 1268);
    }

    #[test]
    fn rate_application_rounds_half_up() {
        // 2.5% of 10.01 = 25.025c -> 25c
        assert_eq!(Money::from_cents(1001).apply_bps(250).value(), 25);
        // 2.5% of 10.10 = 25.25c -> 25c
        assert_eq!(Money::from_cents(1010).apply_bps(250).value(), 25);
        // 2.5% of 10.20 = 25.5c -> 26c
        assert_eq!(Money::from_cents(1020).apply_bps(250).value(), 26);
        // 10% of 0.05 = 0.5c -> 1c
        assert_eq!(Money::from_cents(5).apply_bps(1000).value(), 1);
        assert_eq!(Money::from_cents(1000).percent(10).value(), 100);
    }

    #[test]
    fn display() {
        assert_eq!(Money::from_cents(1234).to_string(), "12.34");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }
}
