//! Rescue calculation: what happens to an open leveraged position when more
//! margin is injected at the current price.
//!
//! The whole computation is a pure function of its request. Nothing is cached
//! and nothing is mutated, so callers may run it from any number of threads.

use crate::liquidation::{distance_to_liquidation_percent, safety_buffer, simplified_liquidation_price};
use crate::position::{
    leveraged_pnl_percent, price_diff_fraction, total_notional, weighted_entry_price, PositionLeg, WeightedEntryError,
};
use crate::risk::{RiskThresholds, RiskTier};
use crate::types::{Leverage, Price, Quote, Side, MAX_LEVERAGE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An existing position plus the capital about to be added to it.
///
/// Fields are raw so the request can come straight off a form or a config
/// file; [`RescueCalculator::compute`] validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInjectionRequest {
    pub side: Side,
    pub entry_price: Decimal,
    pub initial_margin: Decimal,
    pub leverage: u32,
    pub current_price: Decimal,
    pub added_margin: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueResult {
    pub new_entry_price: Price,
    pub pnl_percent: Decimal,
    /// Zero for a 1x long, positive otherwise.
    pub new_liquidation_price: Decimal,
    pub distance_to_liquidation_percent: Decimal,
    pub risk_tier: RiskTier,
    pub initial_notional: Quote,
    pub added_notional: Quote,
    pub total_notional: Quote,
    pub price_diff_fraction: Decimal,
    /// `|liquidation - current|` in quote currency.
    pub safety_buffer: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("Leverage {leverage} outside 1..={max}")]
    LeverageOutOfRange { leverage: u32, max: u32 },

    #[error("{field} must be positive, got {value}")]
    NonPositivePrice { field: &'static str, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    NegativeMargin { field: &'static str, value: Decimal },

    #[error("Total margin must be positive, got {total}")]
    NonPositiveTotalMargin { total: Decimal },

    #[error("Input magnitude out of range: {0} overflowed")]
    Overflow(&'static str),

    #[error("Inputs too small to represent: {0} rounded to zero")]
    PrecisionLoss(&'static str),
}

/// Validated inputs. Only constructed through [`ValidatedRequest::from_request`].
#[derive(Debug, Clone, Copy)]
struct ValidatedRequest {
    side: Side,
    leverage: Leverage,
    current_price: Price,
    existing: PositionLeg,
    injection: PositionLeg,
}

impl ValidatedRequest {
    fn from_request(req: &PositionInjectionRequest, max_leverage: u32) -> Result<Self, InvalidInputError> {
        let max = max_leverage.min(MAX_LEVERAGE);
        let leverage = Leverage::new(req.leverage)
            .filter(|lev| lev.multiplier() <= max)
            .ok_or(InvalidInputError::LeverageOutOfRange {
                leverage: req.leverage,
                max,
            })?;

        let entry_price = Price::new(req.entry_price).ok_or(InvalidInputError::NonPositivePrice {
            field: "entry_price",
            value: req.entry_price,
        })?;
        let current_price = Price::new(req.current_price).ok_or(InvalidInputError::NonPositivePrice {
            field: "current_price",
            value: req.current_price,
        })?;

        let initial_margin = non_negative_margin("initial_margin", req.initial_margin)?;
        let added_margin = non_negative_margin("added_margin", req.added_margin)?;

        let total = initial_margin
            .checked_add(added_margin)
            .ok_or(InvalidInputError::Overflow("total margin"))?;
        if total.value() <= Decimal::ZERO {
            return Err(InvalidInputError::NonPositiveTotalMargin { total: total.value() });
        }

        Ok(Self {
            side: req.side,
            leverage,
            current_price,
            existing: PositionLeg::new(entry_price, initial_margin, leverage),
            injection: PositionLeg::new(current_price, added_margin, leverage),
        })
    }
}

fn non_negative_margin(field: &'static str, value: Decimal) -> Result<Quote, InvalidInputError> {
    let margin = Quote::new(value);
    if margin.is_negative() {
        return Err(InvalidInputError::NegativeMargin { field, value });
    }
    Ok(margin)
}

/// Runs the rescue math under a given tier policy and leverage cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueCalculator {
    pub thresholds: RiskThresholds,
    pub max_leverage: u32,
}

impl Default for RescueCalculator {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            max_leverage: MAX_LEVERAGE,
        }
    }
}

impl RescueCalculator {
    pub fn new(thresholds: RiskThresholds, max_leverage: u32) -> Self {
        Self {
            thresholds,
            max_leverage,
        }
    }

    pub fn compute(&self, request: &PositionInjectionRequest) -> Result<RescueResult, InvalidInputError> {
        let valid = ValidatedRequest::from_request(request, self.max_leverage).map_err(|e| {
            warn!(error = %e, "rejected rescue request");
            e
        })?;

        let initial_notional = valid
            .existing
            .notional()
            .ok_or(InvalidInputError::Overflow("initial notional"))?;
        let added_notional = valid
            .injection
            .notional()
            .ok_or(InvalidInputError::Overflow("added notional"))?;
        let total_notional = total_notional(&[valid.existing, valid.injection])
            .ok_or(InvalidInputError::Overflow("total notional"))?;

        let new_entry_price = weighted_entry_price(&[valid.existing, valid.injection]).map_err(|e| match e {
            WeightedEntryError::PrecisionLoss => InvalidInputError::PrecisionLoss("weighted entry"),
            WeightedEntryError::Overflow => InvalidInputError::Overflow("weighted entry"),
            WeightedEntryError::ZeroNotional => InvalidInputError::NonPositiveTotalMargin { total: Decimal::ZERO },
        })?;

        let price_diff = price_diff_fraction(new_entry_price, valid.current_price)
            .ok_or(InvalidInputError::Overflow("price difference"))?;
        let pnl_percent = leveraged_pnl_percent(price_diff, valid.leverage, valid.side)
            .ok_or(InvalidInputError::Overflow("pnl percent"))?;

        let new_liquidation_price = simplified_liquidation_price(new_entry_price, valid.leverage, valid.side)
            .ok_or(InvalidInputError::Overflow("liquidation price"))?;
        let buffer = safety_buffer(new_liquidation_price, valid.current_price)
            .ok_or(InvalidInputError::Overflow("safety buffer"))?;
        let distance = distance_to_liquidation_percent(new_liquidation_price, valid.current_price)
            .ok_or(InvalidInputError::Overflow("liquidation distance"))?;

        let risk_tier = self.thresholds.classify(distance);

        debug!(
            side = %valid.side,
            leverage = %valid.leverage,
            new_entry = %new_entry_price,
            liquidation = %new_liquidation_price,
            distance = %distance,
            tier = %risk_tier,
            "rescue computed"
        );

        Ok(RescueResult {
            new_entry_price,
            pnl_percent,
            new_liquidation_price,
            distance_to_liquidation_percent: distance,
            risk_tier,
            initial_notional,
            added_notional,
            total_notional,
            price_diff_fraction: price_diff,
            safety_buffer: buffer,
        })
    }
}

/// Default thresholds (5% / 15%) and the full 1..=125 leverage range.
pub fn compute(request: &PositionInjectionRequest) -> Result<RescueResult, InvalidInputError> {
    RescueCalculator::default().compute(request)
}
