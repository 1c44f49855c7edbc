//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//!
//! - `STOREFRONT_DATA_DIR` - Directory for persisted cart and user (default: .voltshop)
//! - `STOREFRONT_CURRENCY` - Display currency code (default: BRL)
//! - `STOREFRONT_SNAPSHOT_POLICY` - `refresh` or `keep_first` (default: refresh)
//! - `STOREFRONT_ACCOUNT_DELAY_MS` - Simulated account backend latency (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use voltshop_core::CurrencyCode;

use crate::cart::SnapshotPolicy;

const DEFAULT_DATA_DIR: &str = ".voltshop";

/// Configuration errors that can occur during loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Where [`FileStorage`](crate::storage::FileStorage) keeps its files
    pub data_dir: PathBuf,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// What re-adding a product does to its cart snapshot
    pub snapshot_policy: SnapshotPolicy,
    /// Latency injected into every mock account call
    pub account_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            currency: CurrencyCode::default(),
            snapshot_policy: SnapshotPolicy::default(),
            account_delay: Duration::ZERO,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let data_dir = PathBuf::from(env.get_or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let currency = env.parse_or_default("STOREFRONT_CURRENCY", "BRL")?;
        let snapshot_policy = env.parse_or_default("STOREFRONT_SNAPSHOT_POLICY", "refresh")?;
        let account_delay =
            Duration::from_millis(env.parse_or_default("STOREFRONT_ACCOUNT_DELAY_MS", "0")?);
        let sentry_dsn = env.get_optional("SENTRY_DSN");
        let sentry_environment = env.get_optional("SENTRY_ENVIRONMENT");

        Ok(Self {
            data_dir,
            currency,
            snapshot_policy,
            account_delay,
            sentry_dsn,
            sentry_environment,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable. Blank values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
