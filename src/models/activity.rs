use chrono::Utc;
use serde::Serialize;

use crate::models::{ActionKind, NormalizedRow, ResolvedSecurity};
use crate::types::format_timestamp;

pub const EXPORT_VERSION: &str = "v0";

/// Where Ghostfolio should source market data for an activity.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataSource {
    Manual,
    Yahoo
}

/// A single activity in Ghostfolio's import format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportActivity {
    pub account_id: String,
    pub comment: String,
    pub fee: f64,
    pub quantity: f64,
    #[serde(rename = "type")]
    pub action: ActionKind,
    pub unit_price: f64,
    pub currency: String,
    pub data_source: DataSource,
    pub date: String,
    pub symbol: String
}

impl ExportActivity {
    /// Builds the manual activity recorded for a fee row. No security is involved, so the
    /// broker label doubles as symbol and comment.
    pub fn fee(account_id: &str, broker: &str, row: &NormalizedRow) -> Self {
        let label = format!("{broker} {}", row.label);

        Self {
            account_id: account_id.to_string(),
            comment: label.clone(),
            fee: row.total_amount.map(f64::abs).unwrap_or(0.0),
            quantity: 1.0,
            action: ActionKind::Fee,
            unit_price: 0.0,
            currency: row.currency.clone(),
            data_source: DataSource::Manual,
            date: format_timestamp(&row.date),
            symbol: label
        }
    }

    /// Builds the activity for a buy, sell or dividend row whose security was resolved.
    pub fn trade(account_id: &str, row: &NormalizedRow, action: ActionKind, security: &ResolvedSecurity) -> Self {
        let (quantity, unit_price) = match action {
            ActionKind::Dividend => (1.0, row.total_amount.map(f64::abs).unwrap_or(1.0)),
            _ => (row.quantity, row.unit_price.or(row.price).unwrap_or(0.0))
        };

        Self {
            account_id: account_id.to_string(),
            comment: String::new(),
            fee: row.fees,
            quantity,
            action,
            unit_price,
            currency: row.currency.clone(),
            data_source: DataSource::Yahoo,
            date: format_timestamp(&row.date),
            symbol: security.symbol.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportMeta {
    pub date: String,
    pub version: String
}

/// The complete export handed back once every row has been processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportResult {
    pub meta: ExportMeta,
    pub activities: Vec<ExportActivity>
}

impl ExportResult {
    pub fn new(activities: Vec<ExportActivity>) -> Self {
        Self {
            meta: ExportMeta {
                date: format_timestamp(&Utc::now().fixed_offset()),
                version: EXPORT_VERSION.to_string()
            },
            activities
        }
    }
}
