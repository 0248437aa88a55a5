//! Configuration loading and representation.

use chrono::Duration;
use thiserror::Error;

pub const CHECKOUT_PRICES_TTL_ENV: &str = "CHECKOUT_PRICES_TTL_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// How long freshly computed checkout prices stay valid.
    pub checkout_prices_ttl: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            checkout_prices_ttl: Duration::hours(1),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(CHECKOUT_PRICES_TTL_ENV) {
            let secs: i64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: CHECKOUT_PRICES_TTL_ENV,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            if secs <= 0 {
                return Err(ConfigError::Invalid {
                    key: CHECKOUT_PRICES_TTL_ENV,
                    value: raw,
                    reason: "must be positive".to_string(),
                });
            }
            config.checkout_prices_ttl =
                Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
                    key: CHECKOUT_PRICES_TTL_ENV,
                    value: raw.clone(),
                    reason: "out of range".to_string(),
                })?;
        }

        tracing::info!(
            checkout_prices_ttl_secs = config.checkout_prices_ttl.num_seconds(),
            "storefront config loaded"
        );
        Ok(config)
    }
}
