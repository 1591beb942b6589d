//! Simplified liquidation price and safety-buffer math.
//!
//! The model assumes a position is wiped out once the adverse move equals its
//! initial margin fraction (1 / leverage). Maintenance-margin tiers, fees and
//! funding are ignored, so the result is an approximation of where an exchange
//! would liquidate, not a venue-specific formula.

use crate::types::{Leverage, Price, Quote, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Price at which the full margin is lost.
///
/// Longs: `entry * (1 - 1/leverage)`. Shorts: `entry * (1 + 1/leverage)`.
/// A 1x long liquidates at exactly zero, so the return is a raw non-negative
/// `Decimal` rather than a [`Price`]. `None` on decimal overflow.
pub fn simplified_liquidation_price(entry_price: Price, leverage: Leverage, side: Side) -> Option<Decimal> {
    let imf = leverage.initial_margin_fraction();

    match side {
        Side::Long => entry_price.value().checked_mul(Decimal::ONE - imf),
        Side::Short => entry_price.value().checked_mul(Decimal::ONE + imf),
    }
}

/// Absolute gap between the mark and the liquidation price, in quote currency.
pub fn safety_buffer(liquidation_price: Decimal, current_price: Price) -> Option<Quote> {
    liquidation_price
        .checked_sub(current_price.value())
        .map(|gap| Quote::new(gap.abs()))
}

/// `|liq - current| / current * 100`. Always non-negative.
pub fn distance_to_liquidation_percent(liquidation_price: Decimal, current_price: Price) -> Option<Decimal> {
    safety_buffer(liquidation_price, current_price)?
        .value()
        .checked_div(current_price.value())?
        .checked_mul(dec!(100))
}
