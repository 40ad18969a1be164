
use thiserror::Error;

pub const ACCOUNT_ID_VARIABLE: &str = "GHOSTFOLIO_ACCOUNT_ID";
pub const DEFAULT_BROKER: &str = "Revolut";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: no account id given, pass --account-id or set GHOSTFOLIO_ACCOUNT_ID")]
    MissingAccountId
}

/// Settings threaded through every export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Ghostfolio account the activities are booked to.
    pub account_id: String,
    /// Label prefixed to manual fee activities.
    pub broker: String
}

impl ExportConfig {
    pub fn new(account_id: impl Into<String>) -> Result<Self, ConfigError> {
        let account_id = account_id.into().trim().to_string();

        if account_id.is_empty() {
            return Err(ConfigError::MissingAccountId);
        }

        Ok(Self {
            account_id,
            broker: DEFAULT_BROKER.to_string()
        })
    }

    /// Prefers an explicit account id and falls back to the environment (including `.env`).
    pub fn resolve(account_id: Option<String>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_sources(account_id, std::env::var(ACCOUNT_ID_VARIABLE).ok())
    }

    /// An explicit account id wins over the environment value.
    pub fn from_sources(explicit: Option<String>, environment: Option<String>) -> Result<Self, ConfigError> {
        let account_id = explicit
            .or(environment)
            .ok_or(ConfigError::MissingAccountId)?;

        Self::new(account_id)
    }
}
