// 1.0: primitives. side, price, quote amounts, leverage, timestamps.
// each is a newtype so a margin never gets passed where a price belongs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard ceiling on leverage accepted anywhere in the crate.
pub const MAX_LEVERAGE: u32 = 125;

// Long = profit when price goes up. Short = profit when price goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Long => dec!(1),
            Side::Short => dec!(-1),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "Long"),
            Side::Short => write!(f, "Short"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            other => Err(format!("unknown side '{other}', expected long or short")),
        }
    }
}

// 1.1: price in quote currency per unit of base. must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value > Decimal::ZERO);
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: quote currency amount. margins, notionals, buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quote(Decimal);

impl Quote {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(&self, other: Quote) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_mul(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.3: integer leverage multiplier in [1, MAX_LEVERAGE].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Leverage(u32);

impl Leverage {
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        if (1..=MAX_LEVERAGE).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn multiplier(&self) -> u32 {
        self.0
    }

    pub fn value(&self) -> Decimal {
        Decimal::from(self.0)
    }

    // 10x leverage → 10% margin fraction (1/10)
    pub fn initial_margin_fraction(&self) -> Decimal {
        Decimal::ONE / self.value()
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

// 1.4: millisecond timestamp. only used by report envelopes, never by the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_sign_and_parse() {
        assert_eq!(Side::Long.sign(), dec!(1));
        assert_eq!(Side::Short.sign(), dec!(-1));
        assert_eq!("SHORT".parse::<Side>().unwrap(), Side::Short);
        assert!("flat".parse::<Side>().is_err());
    }

    #[test]
    fn price_rejects_non_positive() {
        assert!(Price::new(dec!(0)).is_none());
        assert!(Price::new(dec!(-1)).is_none());
        assert_eq!(Price::new(dec!(64500)).unwrap().value(), dec!(64500));
    }

    #[test]
    fn leverage_bounds() {
        assert!(Leverage::new(0).is_none());
        assert!(Leverage::new(126).is_none());
        assert!(Leverage::new(1).is_some());
        assert!(Leverage::new(MAX_LEVERAGE).is_some());
    }

    #[test]
    fn leverage_margin_fraction() {
        let lev_10x = Leverage::new(10).unwrap();
        assert_eq!(lev_10x.initial_margin_fraction(), dec!(0.1));

        let lev_20x = Leverage::new(20).unwrap();
        assert_eq!(lev_20x.initial_margin_fraction(), dec!(0.05));
        assert_eq!(lev_20x.to_string(), "20x");
    }

    #[test]
    fn quote_checked_math() {
        let q = Quote::new(dec!(50));
        assert_eq!(q.checked_mul(dec!(10)).unwrap().value(), dec!(500));
        assert_eq!(q.checked_add(Quote::new(dec!(95))).unwrap().value(), dec!(145));
        assert!(Quote::new(Decimal::MAX).checked_mul(dec!(2)).is_none());
    }

    #[test]
    fn quote_sign() {
        assert!(Quote::new(dec!(-0.01)).is_negative());
        assert!(!Quote::zero().is_negative());
    }
}
