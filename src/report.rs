//! Presentation of a rescue result.
//!
//! Everything locale-dependent lives here: number formatting, labels, the
//! severity banner and the insight paragraph. The math in `rescue` never sees
//! a locale.

use crate::rescue::{PositionInjectionRequest, RescueResult};
use crate::risk::RiskTier;
use crate::types::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "tr" => Ok(Locale::Tr),
            other => Err(format!("unsupported locale '{other}', expected en or tr")),
        }
    }
}

impl Locale {
    // (thousands, decimal)
    fn separators(&self) -> (char, char) {
        match self {
            Locale::En => (',', '.'),
            Locale::Tr => ('.', ','),
        }
    }
}

/// How loudly a tier should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    BlockingAlert,
    Warning,
    Confirmation,
}

impl From<RiskTier> for Severity {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Critical => Severity::BlockingAlert,
            RiskTier::Moderate => Severity::Warning,
            RiskTier::Safe => Severity::Confirmation,
        }
    }
}

/// Two decimals, half away from zero, with locale grouping.
pub fn format_number(value: Decimal, locale: Locale) -> String {
    let (group, point) = locale.separators();
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group);
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}{point}{frac_part}")
}

pub fn format_currency(value: Decimal, locale: Locale) -> String {
    let n = format_number(value, locale);
    match n.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${n}"),
    }
}

pub fn format_percent(value: Decimal, locale: Locale) -> String {
    format!("{}%", format_number(value, locale))
}

struct Labels {
    title: &'static str,
    new_entry: &'static str,
    new_liq: &'static str,
    new_pnl: &'static str,
    buffer: &'static str,
}

fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::En => Labels {
            title: "Post-Capital Injection Analysis",
            new_entry: "New Average Entry",
            new_liq: "New Liq. Price",
            new_pnl: "New PnL (%)",
            buffer: "Safety Buffer (Distance)",
        },
        Locale::Tr => Labels {
            title: "Sermaye Ekleme Sonrası Analiz",
            new_entry: "Yeni Ortalama Giriş",
            new_liq: "Yeni Likidasyon Fiyatı",
            new_pnl: "Yeni K/Z (%)",
            buffer: "Güvenlik Tamponu (Mesafe)",
        },
    }
}

/// One-line banner for the tier, including the distance.
pub fn banner(result: &RescueResult, locale: Locale) -> String {
    let dist = format_percent(result.distance_to_liquidation_percent, locale);
    match (locale, result.risk_tier) {
        (Locale::En, RiskTier::Critical) => {
            format!("CRITICAL RISK: Safety buffer is extremely low ({dist}). Immediate risk of liquidation.")
        }
        (Locale::En, RiskTier::Moderate) => {
            format!("MODERATE RISK: Safety buffer is {dist}. High market volatility could trigger liquidation.")
        }
        (Locale::En, RiskTier::Safe) => {
            format!("SAFE ZONE: Safety buffer established at {dist}. The risk has been significantly mitigated.")
        }
        (Locale::Tr, RiskTier::Critical) => {
            format!("KRİTİK RİSK: Güvenlik tamponu çok düşük ({dist}). Likidasyon riski çok yakın.")
        }
        (Locale::Tr, RiskTier::Moderate) => {
            format!("ORTA RİSK: Güvenlik tamponu {dist}. Yüksek volatilite likidasyonu tetikleyebilir.")
        }
        (Locale::Tr, RiskTier::Safe) => {
            format!("GÜVENLİ BÖLGE: Güvenlik tamponu {dist} seviyesinde. Risk önemli ölçüde azaltıldı.")
        }
    }
}

/// How much was injected, where the entry moved, and how far liquidation now sits.
pub fn insight(request: &PositionInjectionRequest, result: &RescueResult, locale: Locale) -> String {
    let added = format_currency(request.added_margin, locale);
    let entry = format_currency(result.new_entry_price.value(), locale);
    let buffer = format_currency(result.safety_buffer.value(), locale);
    match locale {
        Locale::En => format!(
            "Injecting {added} has recalculated your weighted entry to {entry}. \
             This leaves a safety buffer of {buffer} between the current price and total loss."
        ),
        Locale::Tr => format!(
            "{added} eklenmesiyle ağırlıklı giriş fiyatınız {entry} olarak yeniden hesaplandı. \
             Güncel fiyat ile tam kayıp arasında {buffer} güvenlik tamponu kaldı."
        ),
    }
}

/// Full plain-text report.
pub fn render_text(request: &PositionInjectionRequest, result: &RescueResult, locale: Locale) -> String {
    let l = labels(locale);
    format!(
        "{}\n  {:<28}{}\n  {:<28}{}\n  {:<28}{}\n  {:<28}{}\n\n{}\n\n{}\n",
        l.title,
        l.new_entry,
        format_currency(result.new_entry_price.value(), locale),
        l.new_liq,
        format_currency(result.new_liquidation_price, locale),
        l.new_pnl,
        format_percent(result.pnl_percent, locale),
        l.buffer,
        format_percent(result.distance_to_liquidation_percent, locale),
        banner(result, locale),
        insight(request, result, locale),
    )
}

/// Machine-readable envelope for `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescueReport {
    pub generated_at: Timestamp,
    pub request: PositionInjectionRequest,
    pub result: RescueResult,
    pub severity: Severity,
}

impl RescueReport {
    pub fn new(request: PositionInjectionRequest, result: RescueResult, generated_at: Timestamp) -> Self {
        Self {
            generated_at,
            request,
            result,
            severity: result.risk_tier.into(),
        }
    }
}
