use crate::models::{CryptoRecord, ExportError, InvestRecord, NormalizedRow, RawRow};
use crate::rules::{map_crypto_action, map_invest_action};
use crate::types::{alias_currency, detect_currency, parse_amount, parse_leading_number, parse_quantity, parse_timestamp, CoercionError};

impl RawRow {
    /// Applies the coercion rules of the row's layout.
    pub fn normalize(self, line: u64) -> Result<NormalizedRow, ExportError> {
        match self {
            RawRow::Invest(record) => normalize_invest(record, line),
            RawRow::Crypto(record) => normalize_crypto(record, line)
        }
    }
}

fn normalize_invest(record: InvestRecord, line: u64) -> Result<NormalizedRow, ExportError> {
    let field = move |column: &'static str| move |error: CoercionError| ExportError::invalid_field(line, column, error);

    Ok(NormalizedRow {
        line,
        date: parse_timestamp(&record.date).map_err(field("date"))?,
        action: map_invest_action(&record.label),
        ticker: Some(record.ticker).filter(|ticker| !ticker.is_empty()),
        symbol: record.symbol,
        quantity: parse_amount(&record.quantity).map_err(field("quantity"))?,
        unit_price: Some(parse_amount(&record.price_per_share).map_err(field("pricePerShare"))?),
        price: None,
        total_amount: Some(parse_amount(&record.total_amount).map_err(field("totalAmount"))?),
        value: None,
        fees: 0.0,
        currency: alias_currency(&record.currency),
        label: record.label
    })
}

fn normalize_crypto(record: CryptoRecord, line: u64) -> Result<NormalizedRow, ExportError> {
    let field = move |column: &'static str| move |error: CoercionError| ExportError::invalid_field(line, column, error);

    Ok(NormalizedRow {
        line,
        date: parse_timestamp(&record.date).map_err(field("date"))?,
        action: Some(map_crypto_action(&record.label)),
        ticker: None,
        quantity: parse_quantity(&record.quantity).map_err(field("quantity"))?,
        unit_price: None,
        price: Some(parse_leading_number(&record.price).map_err(field("price"))?),
        total_amount: None,
        value: Some(parse_leading_number(&record.value).map_err(field("value"))?),
        fees: parse_leading_number(&record.fees).map_err(field("fees"))?,
        currency: detect_currency(&record.price).to_string(),
        symbol: record.symbol,
        label: record.label
    })
}
