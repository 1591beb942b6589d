//! Risk tier policy.
//!
//! Buckets the distance to liquidation into three tiers. Boundaries are
//! half-open on the lower side: a distance exactly at a threshold belongs to
//! the safer tier.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Critical,
    Moderate,
    Safe,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTier::Critical => "critical",
            RiskTier::Moderate => "moderate",
            RiskTier::Safe => "safe",
        };
        write!(f, "{label}")
    }
}

/// Distance thresholds in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Anything strictly below this is critical.
    pub critical_below: Decimal,
    /// Anything strictly below this (and not critical) is moderate.
    pub moderate_below: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical_below: dec!(5),
            moderate_below: dec!(15),
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, distance_percent: Decimal) -> RiskTier {
        if distance_percent < self.critical_below {
            RiskTier::Critical
        } else if distance_percent < self.moderate_below {
            RiskTier::Moderate
        } else {
            RiskTier::Safe
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.critical_below > Decimal::ZERO && self.critical_below < self.moderate_below
    }
}

/// Classify with the default 5% / 15% thresholds.
pub fn classify_distance(distance_percent: Decimal) -> RiskTier {
    RiskThresholds::default().classify(distance_percent)
}
