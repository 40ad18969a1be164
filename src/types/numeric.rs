use crate::types::errors::CoercionError;
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9.,]+").expect("leading number pattern is valid")
});

/// Coerces an invest-export amount cell (quantity, price per share, total amount).
///
/// Empty cells are treated as zero. Dollar signs and thousands separators are dropped
/// before parsing, so `"$1,234.5"` yields `1234.5`.
pub fn parse_amount(value: &str) -> Result<f64, CoercionError> {
    let cleaned: String = value.chars()
        .filter(|character| *character != '$' && *character != ',')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    cleaned.parse().map_err(|error| CoercionError::invalid_number(value, error))
}

/// Extracts the first run of digits, dots and commas from a crypto-export money cell
/// (`"€1,234.56"`, `"0.12 SEK"`) and parses it with the grouping commas removed.
pub fn parse_leading_number(value: &str) -> Result<f64, CoercionError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(0.0);
    }

    let Some(token) = LEADING_NUMBER.find(value) else {
        return Err(CoercionError::MissingNumber(value.to_string()));
    };

    let digits = token.as_str().replace(',', "");

    digits.parse().map_err(|error| CoercionError::invalid_number(value, error))
}

/// Parses a crypto-export quantity cell as-is.
pub fn parse_quantity(value: &str) -> Result<f64, CoercionError> {
    let value = value.trim();

    value.parse().map_err(|error| CoercionError::invalid_number(value, error))
}
