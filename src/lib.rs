// margin-guardian: rescue calculator for leveraged positions.
// given an open position and a capital injection, derive the blended entry,
// leveraged pnl, simplified liquidation price, and how far away it sits.
// all computation is deterministic decimal math with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Side, Price, Quote, Leverage, Timestamp
//   2.x  position.rs: legs, notional-weighted entry, leveraged pnl
//   3.x  liquidation.rs: simplified liquidation price, safety buffer
//   4.x  risk.rs: critical / moderate / safe tier policy
//   5.x  config.rs: thresholds, leverage cap, form defaults, TOML loading
//   6.x  rescue.rs: request validation + the rescue computation
//   7.x  report.rs: locale formatting, severity banner, JSON envelope

pub mod config;
pub mod liquidation;
pub mod position;
pub mod report;
pub mod rescue;
pub mod risk;
pub mod types;

// re exports for convenience
pub use config::{CalculatorConfig, ConfigError, DisplayConfig, InputDefaults, LimitsConfig};
pub use liquidation::*;
pub use position::*;
pub use report::{Locale, RescueReport, Severity};
pub use rescue::*;
pub use risk::*;
pub use types::*;
