use serde::Serialize;

/// A tradable security matched by the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSecurity {
    /// Canonical symbol on the provider (e.g. "AAPL", "VUSA.L", "BTC-EUR").
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
    /// Currency the provider quotes the security in.
    pub currency: Option<String>
}

impl ResolvedSecurity {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            exchange: None,
            quote_type: None,
            currency: None
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}
