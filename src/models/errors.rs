use thiserror::Error;

use crate::lookup::LookupError;
use crate::types::CoercionError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unable to parse the export: {message}")]
    Parse {
        message: String
    },
    #[error("Unable to parse the export: invalid [{column}] on line [{line}]: {source}")]
    InvalidField {
        line: u64,
        column: &'static str,
        #[source]
        source: CoercionError
    },
    #[error("Unable to parse the export: no transactions found")]
    EmptyInput,
    #[error("Security lookup failed for row [{row}] with key [{key}]: {source}")]
    Lookup {
        row: usize,
        key: String,
        #[source]
        source: LookupError
    }
}

impl ExportError {
    pub fn parse(error: csv::Error) -> Self {
        Self::Parse { message: error.to_string() }
    }

    pub fn invalid_field(line: u64, column: &'static str, source: CoercionError) -> Self {
        Self::InvalidField { line, column, source }
    }

    pub fn lookup(row: usize, key: &str, source: LookupError) -> Self {
        Self::Lookup { row, key: key.to_string(), source }
    }
}
