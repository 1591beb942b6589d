// 2.0: position legs and the blended entry they produce.
// 2.1 weighted entry uses notional (margin * leverage) as the weight, never raw margin,
// so a leg with its own leverage drops in without changing the formula.

use crate::types::{Leverage, Price, Quote, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One tranche of capital committed at a single price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLeg {
    pub price: Price,
    pub margin: Quote,
    pub leverage: Leverage,
}

impl PositionLeg {
    pub fn new(price: Price, margin: Quote, leverage: Leverage) -> Self {
        Self {
            price,
            margin,
            leverage,
        }
    }

    /// Effective exposure: margin * leverage. `None` on decimal overflow.
    pub fn notional(&self) -> Option<Quote> {
        self.margin.checked_mul(self.leverage.value())
    }
}

/// Sum of leg notionals. `None` on overflow.
pub fn total_notional(legs: &[PositionLeg]) -> Option<Quote> {
    legs.iter()
        .try_fold(Quote::zero(), |acc, leg| acc.checked_add(leg.notional()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WeightedEntryError {
    #[error("Total notional is zero")]
    ZeroNotional,

    #[error("Weighted entry overflowed")]
    Overflow,

    #[error("Weighted entry rounded to zero")]
    PrecisionLoss,
}

// 2.1: sum(notional_i * price_i) / sum(notional_i)
// legs that all trade at one price blend to that price without any multiplication.
pub fn weighted_entry_price(legs: &[PositionLeg]) -> Result<Price, WeightedEntryError> {
    let total = total_notional(legs).ok_or(WeightedEntryError::Overflow)?;
    if total.value() <= Decimal::ZERO {
        return Err(WeightedEntryError::ZeroNotional);
    }

    let mut weighted = legs.iter().filter(|leg| !leg.margin.value().is_zero());
    if let Some(first) = weighted.next() {
        if weighted.all(|leg| leg.price == first.price) {
            return Ok(first.price);
        }
    }

    let weighted_sum = legs
        .iter()
        .try_fold(Decimal::ZERO, |acc, leg| {
            let term = leg.notional()?.value().checked_mul(leg.price.value())?;
            acc.checked_add(term)
        })
        .ok_or(WeightedEntryError::Overflow)?;

    let blended = weighted_sum
        .checked_div(total.value())
        .ok_or(WeightedEntryError::Overflow)?;
    Price::new(blended).ok_or(WeightedEntryError::PrecisionLoss)
}

// 2.2: signed fractional move from entry to mark. 0.05 = mark is 5% above entry.
pub fn price_diff_fraction(entry: Price, mark: Price) -> Option<Decimal> {
    (mark.value() - entry.value()).checked_div(entry.value())
}

// 2.3: leveraged pnl in percent of margin. longs gain when price rises, shorts when it falls.
pub fn leveraged_pnl_percent(price_diff: Decimal, leverage: Leverage, side: Side) -> Option<Decimal> {
    (side.sign() * price_diff)
        .checked_mul(leverage.value())?
        .checked_mul(dec!(100))
}
