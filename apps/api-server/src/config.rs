//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for local development.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// First invoice sequence issued for an empty year partition
    pub invoice_sequence_floor: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: env::var("URED_DATABASE_PATH")
                .unwrap_or_else(|_| "./ured.db".to_string()),

            jwt_secret: env::var("URED_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "ured-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("URED_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("URED_JWT_LIFETIME_SECS".to_string()))?,

            invoice_sequence_floor: env::var("URED_INVOICE_FLOOR")
                .unwrap_or_else(|_| ured_core::DEFAULT_SEQUENCE_FLOOR.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("URED_INVOICE_FLOOR".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_env() {
        // The test environment sets none of the URED_* vars
        let config = ApiConfig::load().unwrap();
        assert_eq!(config.database_path, "./ured.db");
        assert_eq!(config.invoice_sequence_floor, 223);
        assert_eq!(config.jwt_lifetime_secs, 3600);
    }
}
