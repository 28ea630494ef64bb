//! API configuration.

use std::time::Duration;

/// Session token lifetime: 60 days.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 24 * 60 * 60);

/// Placeholder secret used when JWT_SECRET is unset. Rejected in production.
pub const DEV_JWT_SECRET: &str = "dev-secret-do-not-use-in-production";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (general routes)
    pub rate_limit_rps: u32,
    /// Rate limit requests per second (auth routes)
    pub auth_rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub token_ttl: Duration,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            auth_rate_limit_rps: 5,
            max_body_size: 1024 * 1024, // 1MB
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: TOKEN_TTL,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            auth_rate_limit_rps: std::env::var("AUTH_RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            token_ttl: Duration::from_secs(
                std::env::var("TOKEN_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(TOKEN_TTL.as_secs()),
            ),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Reject configurations that must not reach production.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.jwt_secret.len() < 16 {
            return Err("JWT_SECRET must be at least 16 bytes".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid_in_dev() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dev_secret_rejected_in_production() {
        let config = ApiConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = ApiConfig {
            jwt_secret: "short".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
