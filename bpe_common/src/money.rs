use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const YUAN_CURRENCY_CODE: &str = "CNY";
pub const YUAN_CURRENCY_CODE_LOWER: &str = "cny";

//--------------------------------------        Money        ---------------------------------------------------------

/// A currency amount, stored as an integer number of cents.
///
/// All platform pricing rules round to the nearest cent (half away from zero), so cents are the natural unit of
/// account and floating point only ever appears transiently inside [`Money::scale`] and [`Money::div_rate`].
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
#[error("Value cannot be represented as a money amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
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

impl TryFrom<f64> for Money {
    type Error = MoneyConversionError;

    /// Converts a yuan amount (e.g. a parsed `12.5`) into cents, rounding half away from zero.
    fn try_from(yuan: f64) -> Result<Self, Self::Error> {
        let cents = yuan * 100.0;
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return Err(MoneyConversionError(format!("Value {yuan} cannot be expressed in cents")));
        }
        Ok(Self(cents.round() as i64))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yuan = self.0 as f64 / 100.0;
        write!(f, "¥{yuan:0.2}")
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_yuan(yuan: i64) -> Self {
        Self(yuan * 100)
    }

    /// Multiplies by `factor`, rounding to the nearest cent. `Money::from_yuan(100).scale(1.2)` is ¥120.00.
    pub fn scale(self, factor: f64) -> Self {
        Self((self.0 as f64 * factor).round() as i64)
    }

    /// Divides by `rate`, rounding to the nearest cent. The caller clamps `rate` away from zero.
    pub fn div_rate(self, rate: f64) -> Self {
        Self((self.0 as f64 / rate).round() as i64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_formats_cents() {
        assert_eq!(Money::from_yuan(120).to_string(), "¥120.00");
        assert_eq!(Money::from(1_234).to_string(), "¥12.34");
        assert_eq!(Money::from(5).to_string(), "¥0.05");
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_yuan(10);
        let b = Money::from(250);
        assert_eq!(a + b, Money::from(1_250));
        assert_eq!(a - b, Money::from(750));
        assert_eq!(-b, Money::from(-250));
        assert_eq!(b * 3, Money::from(750));
        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Money::from(1_500));
    }

    #[test]
    fn scale_rounds_to_nearest_cent() {
        // 10.99 * 75% = 8.2425 -> 8.24
        assert_eq!(Money::from(1_099).scale(0.75), Money::from(824));
        assert_eq!(Money::from_yuan(100).scale(1.2), Money::from_yuan(120));
        assert_eq!(Money::from(1).scale(0.5), Money::from(1));
    }

    #[test]
    fn div_rate_rounds_to_nearest_cent() {
        assert_eq!(Money::from_yuan(80).div_rate(0.8), Money::from_yuan(100));
        // 100 / 0.75 = 133.33...
        assert_eq!(Money::from_yuan(100).div_rate(0.75), Money::from(13_333));
    }

    #[test]
    fn yuan_conversions() {
        assert_eq!(Money::try_from(12.5f64).unwrap(), Money::from(1_250));
        assert_eq!(Money::try_from(0.1f64).unwrap(), Money::from(10));
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(u64::MAX).is_err());
    }
}
