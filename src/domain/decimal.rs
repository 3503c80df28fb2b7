//! Lossless money type backed by rust_decimal.
//!
//! Ledger amounts arrive as JSON numbers or decimal strings; both decode
//! without going through binary floating point. Comparisons are exact, which
//! is what competition tie detection relies on.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Exact decimal amount used for every monetary value in the engine.
///
/// Serializes to a JSON number; deserializes from a number or a string.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Whole-unit amount, e.g. a draw of 4000.
    pub fn from_units(units: i64) -> Self {
        Decimal(RustDecimal::from(units))
    }

    /// Fixed-point constructor: `from_scaled(14, 2)` is 0.14.
    pub fn from_scaled(num: i64, scale: u32) -> Self {
        Decimal(RustDecimal::new(num, scale))
    }

    /// Canonical string with trailing zeros removed and no exponent.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    /// Cents rendering used by the HTTP layer (`112.5` -> `"112.50"`).
    pub fn to_money_string(&self) -> String {
        format!("{:.2}", self.round_cents().0)
    }

    /// Round half away from zero to two places.
    pub fn round_cents(&self) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Clamp negative values to zero.
    pub fn floor_zero(self) -> Self {
        if self.is_negative() {
            Decimal::zero()
        } else {
            self
        }
    }

    /// Divide by a non-zero count of recipients.
    pub fn split(self, ways: usize) -> Self {
        if ways == 0 {
            return Decimal::zero();
        }
        Decimal(self.0 / RustDecimal::from(ways as u64))
    }
}

/// Nullable-amount decoding: JSON `null` or a missing value becomes zero.
pub fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_money_string_pads_to_cents() {
        assert_eq!(d("112.5").to_money_string(), "112.50");
        assert_eq!(d("1400").to_money_string(), "1400.00");
        assert_eq!(d("-12.345").to_money_string(), "-12.35");
    }

    #[test]
    fn test_split_three_ways_sums_back_within_a_cent() {
        let prize = d("100");
        let share = prize.split(3);
        let total = share + share + share;
        assert!((prize - total).inner().abs() < d("0.01").inner());
        assert_eq!(share.to_money_string(), "33.33");
    }

    #[test]
    fn test_split_by_zero_is_zero() {
        assert!(d("225").split(0).is_zero());
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(d("-5").floor_zero(), Decimal::zero());
        assert_eq!(d("5").floor_zero(), d("5"));
    }

    #[test]
    fn test_exact_multiplication() {
        let base = d("10000") * Decimal::from_scaled(14, 2);
        assert_eq!(base, d("1400"));
        assert_eq!(base.to_canonical_string(), "1400");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_num: Decimal = serde_json::from_value(serde_json::json!(249.99)).unwrap();
        let from_str: Decimal = serde_json::from_value(serde_json::json!("249.99")).unwrap();
        assert_eq!(from_num, d("249.99"));
        assert_eq!(from_str, d("249.99"));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(d("123.456")).unwrap();
        assert!(json.is_number());
    }

    #[test]
    fn test_sum() {
        let total: Decimal = vec![d("1.10"), d("2.20"), d("3.30")].iter().sum();
        assert_eq!(total, d("6.6"));
    }
}
