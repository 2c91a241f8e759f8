//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

use deliverus_core::{Money, DEFAULT_FREE_SHIPPING_THRESHOLD};
use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// SQLite database file
    pub db_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// JWT secret shared with the auth service that issues customer tokens
    pub jwt_secret: String,

    /// Lifetime of tokens issued by [`crate::auth::JwtManager::issue`]
    pub jwt_lifetime_secs: i64,

    /// Product subtotal above which shipping is waived
    pub free_shipping_threshold: Money,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            host: env::var("DELIVERUS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("DELIVERUS_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DELIVERUS_PORT".to_string()))?,

            db_path: env::var("DELIVERUS_DB_PATH")
                .unwrap_or_else(|_| "./deliverus.db".to_string()),

            db_max_connections: env::var("DELIVERUS_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DELIVERUS_DB_MAX_CONNECTIONS".to_string()))?,

            // In production this MUST be set to the auth service's secret
            jwt_secret: env::var("DELIVERUS_JWT_SECRET")
                .unwrap_or_else(|_| "deliverus-dev-secret-change-in-production".to_string()),

            jwt_lifetime_secs: env::var("DELIVERUS_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 1 day
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DELIVERUS_JWT_LIFETIME_SECS".to_string()))?,

            free_shipping_threshold: env::var("DELIVERUS_FREE_SHIPPING_THRESHOLD_CENTS")
                .ok()
                .map(|raw| {
                    raw.parse::<i64>().map(Money::from_cents).map_err(|_| {
                        ConfigError::InvalidValue(
                            "DELIVERUS_FREE_SHIPPING_THRESHOLD_CENTS".to_string(),
                        )
                    })
                })
                .transpose()?
                .unwrap_or(DEFAULT_FREE_SHIPPING_THRESHOLD),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("DELIVERUS_JWT_SECRET".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DELIVERUS_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if self.free_shipping_threshold.is_negative() {
            return Err(ConfigError::InvalidValue(
                "DELIVERUS_FREE_SHIPPING_THRESHOLD_CENTS".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            db_path: "./deliverus.db".to_string(),
            db_max_connections: 5,
            jwt_secret: "deliverus-dev-secret-change-in-production".to_string(),
            jwt_lifetime_secs: 86400,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.free_shipping_threshold, Money::from_cents(1000));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = ApiConfig {
            jwt_secret: String::new(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_zero_pool_rejected() {
        let config = ApiConfig {
            db_max_connections: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
