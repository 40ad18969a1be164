//! Yahoo Finance backed [`SecurityLookup`].
//!
//! Candidates come from the search endpoint; the chart endpoint supplies the currency each
//! candidate is quoted in, which is what decides a match.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::lookup::{LookupError, LookupRequest, SecurityLookup};
use crate::models::ResolvedSecurity;
use crate::progress::ProgressHandle;

pub const PROVIDER: &str = "YAHOO";

const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const BROWSER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchQuote {
    pub symbol: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default, rename = "shortname")]
    pub short_name: Option<String>,
    #[serde(default, rename = "longname")]
    pub long_name: Option<String>,
    #[serde(default)]
    pub quote_type: Option<String>
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    currency: Option<String>
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String
}

pub struct YahooLookup {
    client: Client,
    cache: Cache<String, Option<ResolvedSecurity>>
}

impl YahooLookup {
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|error| LookupError::request(PROVIDER, error))?;

        Ok(Self {
            client,
            cache: Cache::builder()
                .max_capacity(1_024)
                .time_to_live(Duration::from_secs(60 * 60))
                .build()
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchQuote>, LookupError> {
        debug!("Searching {PROVIDER} for [{query}]");

        let response = self.client
            .get(SEARCH_URL)
            .query(&[("q", query), ("quotesCount", "10"), ("newsCount", "0")])
            .send()
            .await
            .map_err(|error| LookupError::request(PROVIDER, error))?;

        if !response.status().is_success() {
            return Err(LookupError::Status { provider: PROVIDER, status: response.status().as_u16() });
        }

        let body: SearchResponse = response.json()
            .await
            .map_err(|error| LookupError::request(PROVIDER, error))?;

        Ok(body.quotes)
    }

    /// The currency a symbol is quoted in, or `None` when Yahoo has no chart for it.
    async fn quote_currency(&self, symbol: &str) -> Result<Option<String>, LookupError> {
        let response = self.client
            .get(format!("{CHART_URL}/{symbol}"))
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await
            .map_err(|error| LookupError::request(PROVIDER, error))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(LookupError::Status { provider: PROVIDER, status: response.status().as_u16() });
        }

        let body: ChartResponse = response.json()
            .await
            .map_err(|error| LookupError::request(PROVIDER, error))?;

        if let Some(error) = body.chart.error {
            return Err(LookupError::provider(PROVIDER, format!("{}: {}", error.code, error.description)));
        }

        Ok(body.chart.result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.meta.currency))
    }

    async fn find_security(&self, request: &LookupRequest, progress: &dyn ProgressHandle) -> Result<Option<ResolvedSecurity>, LookupError> {
        let query = request.hint.as_deref().unwrap_or(&request.key);
        let quotes = self.search(query).await?;

        for quote in rank_candidates(request, quotes) {
            let Some(currency) = self.quote_currency(&quote.symbol).await? else {
                continue;
            };

            if currency_matches(&request.currency, &currency) {
                let mut security = ResolvedSecurity::new(quote.symbol).with_currency(currency);
                security.name = quote.long_name.or(quote.short_name);
                security.exchange = quote.exchange;
                security.quote_type = quote.quote_type;

                return Ok(Some(security));
            }

            progress.log(&format!("[{}] is quoted in [{currency}], expected [{}] for [{}]", quote.symbol, request.currency, request.key));
        }

        Ok(None)
    }
}

#[async_trait]
impl SecurityLookup for YahooLookup {
    async fn lookup(&self, request: &LookupRequest, progress: &dyn ProgressHandle) -> Result<Option<ResolvedSecurity>, LookupError> {
        let cache_key = format!("{}|{}", request.key, request.currency);

        if let Some(security) = self.cache.get(&cache_key).await {
            debug!("Cache hit for [{cache_key}]");
            return Ok(security);
        }

        let security = self.find_security(request, progress).await?;
        self.cache.insert(cache_key, security.clone()).await;

        Ok(security)
    }
}

/// Orders search results for currency checks: an exact symbol match comes first, results
/// on another exchange than the requested one are dropped, and the list is capped.
pub(crate) fn rank_candidates(request: &LookupRequest, quotes: Vec<SearchQuote>) -> Vec<SearchQuote> {
    let mut candidates: Vec<SearchQuote> = quotes.into_iter()
        .filter(|quote| match (&request.exchange, &quote.exchange) {
            (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
            (None, _) => true
        })
        .collect();

    candidates.sort_by_key(|quote| !quote.symbol.eq_ignore_ascii_case(&request.key));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// Yahoo quotes London listings in `GBp`, so pence and pounds compare equal.
pub(crate) fn currency_matches(expected: &str, actual: &str) -> bool {
    expected.eq_ignore_ascii_case(actual)
}
