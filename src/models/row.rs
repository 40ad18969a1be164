use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::models::ActionKind;

/// A row of the stock/ETF ("invest") export, keyed by camelCased header names.
///
/// Every field defaults to empty so that older exports lacking a column (e.g. `symbol`)
/// still deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvestRecord {
    pub date: String,
    #[serde(rename = "type")]
    pub label: String,
    pub ticker: String,
    pub symbol: String,
    pub quantity: String,
    pub price_per_share: String,
    pub total_amount: String,
    pub currency: String
}

/// A row of the seven-column crypto export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CryptoRecord {
    pub date: String,
    #[serde(rename = "type")]
    pub label: String,
    pub symbol: String,
    pub quantity: String,
    pub price: String,
    pub value: String,
    pub fees: String
}

#[derive(Debug, Clone)]
pub enum RawRow {
    Invest(InvestRecord),
    Crypto(CryptoRecord)
}

impl RawRow {
    /// The type text exactly as exported.
    pub fn label(&self) -> &str {
        match self {
            RawRow::Invest(record) => &record.label,
            RawRow::Crypto(record) => &record.label
        }
    }
}

/// A tokenized row: either skipped by the ignore rules before any cell was coerced, or
/// fully coerced.
#[derive(Debug, Clone)]
pub enum ParsedRow {
    Ignored {
        line: u64,
        label: String
    },
    Normalized(NormalizedRow)
}

/// A row after field coercion, shared by both layouts.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    /// Line of the row in the source file (the header is line 1).
    pub line: u64,
    pub date: DateTime<FixedOffset>,
    /// The type text exactly as exported, used for fee labels and diagnostics.
    pub label: String,
    /// `None` when the label matched no action rule.
    pub action: Option<ActionKind>,
    pub ticker: Option<String>,
    pub symbol: String,
    pub quantity: f64,
    /// Price per share (invest layout only).
    pub unit_price: Option<f64>,
    /// Raw price (crypto layout only).
    pub price: Option<f64>,
    /// Total amount (invest layout only).
    pub total_amount: Option<f64>,
    /// Fiat value of the row (crypto layout only).
    pub value: Option<f64>,
    pub fees: f64,
    pub currency: String
}
