// 5.0 config.rs: all settings in one place. tier thresholds, leverage cap, form defaults.
// 5.1 loads from TOML; every section is optional and falls back to Default.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::report::Locale;
use crate::rescue::{PositionInjectionRequest, RescueCalculator};
use crate::risk::RiskThresholds;
use crate::types::{Side, MAX_LEVERAGE};

// Leverage limits applied before any math runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    // Highest leverage a request may use. never above MAX_LEVERAGE
    pub max_leverage: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_leverage: MAX_LEVERAGE,
        }
    }
}

// Values a form starts with before the user touches anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub side: Side,
    pub entry_price: Decimal,
    pub initial_margin: Decimal,
    pub leverage: u32,
    pub current_price: Decimal,
    pub added_margin: Decimal,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            side: Side::Short,
            entry_price: dec!(60000),
            initial_margin: dec!(50),
            leverage: 10,
            current_price: dec!(64500),
            added_margin: dec!(95),
        }
    }
}

impl InputDefaults {
    pub fn to_request(&self) -> PositionInjectionRequest {
        PositionInjectionRequest {
            side: self.side,
            entry_price: self.entry_price,
            initial_margin: self.initial_margin,
            leverage: self.leverage,
            current_price: self.current_price,
            added_margin: self.added_margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: Locale,
}

// The complete calculator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub risk: RiskThresholds,
    pub limits: LimitsConfig,
    pub defaults: InputDefaults,
    pub display: DisplayConfig,
}

impl CalculatorConfig {
    // Wider safety bands for users who want earlier warnings
    pub fn conservative() -> Self {
        let mut config = Self::default();
        config.risk.critical_below = dec!(10);
        config.risk.moderate_below = dec!(25);
        config.limits.max_leverage = 20;
        config
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.risk.is_ordered() {
            return Err(ConfigError::InvalidRisk {
                reason: "thresholds must satisfy 0 < critical_below < moderate_below".to_string(),
            });
        }

        if self.limits.max_leverage == 0 || self.limits.max_leverage > MAX_LEVERAGE {
            return Err(ConfigError::InvalidLimits {
                reason: format!("max_leverage must be between 1 and {MAX_LEVERAGE}"),
            });
        }

        // defaults must at least fit the form bounds; a zero total margin is
        // still allowed since the form lets the user get there too
        let d = &self.defaults;
        if d.leverage == 0 || d.leverage > self.limits.max_leverage {
            return Err(ConfigError::InvalidDefaults {
                reason: format!("default leverage {} exceeds configured limits", d.leverage),
            });
        }
        if d.entry_price < Decimal::ZERO
            || d.current_price < Decimal::ZERO
            || d.initial_margin < Decimal::ZERO
            || d.added_margin < Decimal::ZERO
        {
            return Err(ConfigError::InvalidDefaults {
                reason: "default prices and margins must be non-negative".to_string(),
            });
        }

        Ok(())
    }

    pub fn calculator(&self) -> RescueCalculator {
        RescueCalculator::new(self.risk, self.limits.max_leverage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid risk thresholds: {reason}")]
    InvalidRisk { reason: String },

    #[error("Invalid limits: {reason}")]
    InvalidLimits { reason: String },

    #[error("Invalid input defaults: {reason}")]
    InvalidDefaults { reason: String },

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {reason}")]
    Parse { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskTier;

    #[test]
    fn test_default_config_valid() {
        let config = CalculatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.max_leverage, 125);
        assert_eq!(config.display.locale, Locale::En);
    }

    #[test]
    fn test_conservative_config_valid() {
        let config = CalculatorConfig::conservative();
        assert!(config.validate().is_ok());
        assert_eq!(config.calculator().max_leverage, 20);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = CalculatorConfig::default();
        config.risk.critical_below = dec!(20);

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::InvalidRisk { .. })));
    }

    #[test]
    fn test_invalid_limits() {
        let mut config = CalculatorConfig::default();
        config.limits.max_leverage = 200;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLimits { .. })));

        config.limits.max_leverage = 5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDefaults { .. })));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let toml = r#"
            [risk]
            critical_below = "8"
            moderate_below = "20"

            [display]
            locale = "tr"
        "#;
        let config = CalculatorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.risk.critical_below, dec!(8));
        assert_eq!(config.display.locale, Locale::Tr);
        assert_eq!(config.defaults, InputDefaults::default());
        assert_eq!(config.limits.max_leverage, MAX_LEVERAGE);
    }

    #[test]
    fn test_toml_defaults_section() {
        let toml = r#"
            [defaults]
            side = "Long"
            entry_price = "100"
            leverage = 5
        "#;
        let config = CalculatorConfig::from_toml_str(toml).unwrap();
        let req = config.defaults.to_request();
        assert_eq!(req.side, Side::Long);
        assert_eq!(req.entry_price, dec!(100));
        assert_eq!(req.initial_margin, dec!(50));
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(matches!(
            CalculatorConfig::from_toml_str("risk = 3"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            CalculatorConfig::load("/nonexistent/margin-guardian.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_defaults_produce_moderate_rescue() {
        let config = CalculatorConfig::default();
        let result = config.calculator().compute(&config.defaults.to_request()).unwrap();
        assert_eq!(result.risk_tier, RiskTier::Moderate);
    }

    #[test]
    fn test_config_serialization() {
        let config = CalculatorConfig::conservative();
        let json = serde_json::to_string(&config).unwrap();
        let back: CalculatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
