use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup error: request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error
    },
    #[error("Lookup error: {provider} responded with HTTP {status}")]
    Status {
        provider: &'static str,
        status: u16
    },
    #[error("Lookup error: {provider} returned an error: {message}")]
    Provider {
        provider: &'static str,
        message: String
    }
}

impl LookupError {
    pub fn request(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Request { provider, source }
    }

    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider { provider, message: message.into() }
    }
}
