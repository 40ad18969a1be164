mod errors;
mod resolver;
mod yahoo;

use async_trait::async_trait;

use crate::models::ResolvedSecurity;
use crate::progress::ProgressHandle;

pub use errors::LookupError;
pub use resolver::SecurityResolver;
pub use yahoo::YahooLookup;

/// What is known about a row's security when asking the lookup service.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    /// Ticker from the export, when it has one.
    pub hint: Option<String>,
    /// Search key: the ticker, or `"{symbol}-{currency}"`.
    pub key: String,
    pub exchange: Option<String>,
    /// Currency the security is expected to be quoted in.
    pub currency: String
}

/// Resolves export tickers and symbols to tradable securities.
///
/// `Ok(None)` means the service answered but had no match.
#[async_trait]
pub trait SecurityLookup: Send + Sync + 'static {
    async fn lookup(&self, request: &LookupRequest, progress: &dyn ProgressHandle) -> Result<Option<ResolvedSecurity>, LookupError>;
}
