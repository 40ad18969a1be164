pub mod activity;
mod errors;
mod row;
mod security;

use serde::Serialize;

pub use activity::{ExportActivity, ExportResult};
pub use errors::ExportError;
pub use row::{CryptoRecord, InvestRecord, NormalizedRow, ParsedRow, RawRow};
pub use security::ResolvedSecurity;

/// Normalized transaction category of a row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Buy,
    Sell,
    Dividend,
    Fee
}

/// The two layouts a Revolut export can come in.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Schema {
    Invest,
    Crypto
}
