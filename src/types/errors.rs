use std::num::ParseFloatError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoercionError {
    #[error("Coercion error: [{value}] is not a number: {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseFloatError
    },
    #[error("Coercion error: [{0}] does not contain a numeric value")]
    MissingNumber(String),
    #[error("Coercion error: [{0}] is not a recognised date")]
    InvalidDate(String)
}

impl CoercionError {
    pub fn invalid_number(value: &str, source: ParseFloatError) -> Self {
        Self::InvalidNumber { value: value.to_string(), source }
    }
}
