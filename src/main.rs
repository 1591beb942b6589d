//! Margin Guardian command line.
//!
//! Collects the six position inputs, runs the rescue computation, and prints
//! either a human report or a JSON envelope. Unset flags fall back to the
//! config file, then to the built-in form defaults.

use anyhow::{Context, Result};
use clap::Parser;
use margin_guardian::report::{render_text, RescueReport};
use margin_guardian::{CalculatorConfig, Locale, PositionInjectionRequest, Side, Timestamp};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Liquidation mitigation and DCA analytics for leveraged positions")]
struct Args {
    /// Path to a TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Position side (long or short)
    #[clap(long)]
    side: Option<Side>,

    /// Initial entry price
    #[clap(long)]
    entry_price: Option<Decimal>,

    /// Margin currently committed
    #[clap(long)]
    initial_margin: Option<Decimal>,

    /// Leverage multiplier (1-125)
    #[clap(short, long)]
    leverage: Option<u32>,

    /// Add-on / market price
    #[clap(long)]
    current_price: Option<Decimal>,

    /// Capital to inject
    #[clap(long)]
    added_margin: Option<Decimal>,

    /// Output locale (en or tr)
    #[clap(long)]
    locale: Option<Locale>,

    /// Print a JSON report instead of text
    #[clap(long)]
    json: bool,
}

impl Args {
    fn request(&self, config: &CalculatorConfig) -> PositionInjectionRequest {
        let mut req = config.defaults.to_request();
        if let Some(side) = self.side {
            req.side = side;
        }
        if let Some(v) = self.entry_price {
            req.entry_price = v;
        }
        if let Some(v) = self.initial_margin {
            req.initial_margin = v;
        }
        if let Some(v) = self.leverage {
            req.leverage = v;
        }
        if let Some(v) = self.current_price {
            req.current_price = v;
        }
        if let Some(v) = self.added_margin {
            req.added_margin = v;
        }
        req
    }
}

fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,margin_guardian=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();

    let config = match &args.config {
        Some(path) => CalculatorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    debug!(?config, "configuration loaded");

    let request = args.request(&config);
    let locale = args.locale.unwrap_or(config.display.locale);

    let result = config
        .calculator()
        .compute(&request)
        .context("Rescue calculation rejected the inputs")?;

    info!(tier = %result.risk_tier, distance = %result.distance_to_liquidation_percent, "rescue evaluated");

    if args.json {
        let report = RescueReport::new(request, result, Timestamp::now());
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render_text(&request, &result, locale));
    }

    Ok(())
}
