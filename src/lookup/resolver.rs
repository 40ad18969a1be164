use std::sync::Arc;

use tracing::debug;

use crate::lookup::{LookupError, LookupRequest, SecurityLookup};
use crate::models::{NormalizedRow, ResolvedSecurity};
use crate::progress::ProgressHandle;

/// Builds lookup requests from rows and interprets the service's answers.
pub struct SecurityResolver<L: SecurityLookup> {
    lookup: Arc<L>
}

impl<L: SecurityLookup> SecurityResolver<L> {
    pub fn new(lookup: Arc<L>) -> Self {
        Self { lookup }
    }

    /// Uses the row's ticker when present, otherwise `"{symbol}-{currency}"` (e.g. `"BTC-EUR"`).
    pub fn request_for(row: &NormalizedRow) -> LookupRequest {
        let key = match &row.ticker {
            Some(ticker) => ticker.clone(),
            None => format!("{}-{}", row.symbol, row.currency)
        };

        LookupRequest {
            hint: row.ticker.clone(),
            key,
            exchange: None,
            currency: row.currency.clone()
        }
    }

    /// Returns `Ok(None)` for unmatched securities after noting them on the progress stream.
    /// Service failures are passed through untouched.
    pub async fn resolve(&self, request: &LookupRequest, progress: &dyn ProgressHandle) -> Result<Option<ResolvedSecurity>, LookupError> {
        let security = self.lookup.lookup(request, progress).await?;

        match &security {
            Some(security) => debug!("Resolved [{}] to [{}]", request.key, security.symbol),
            None => progress.log(&format!("No security found for [{}] in [{}], the row was skipped", request.key, request.currency))
        }

        Ok(security)
    }
}
