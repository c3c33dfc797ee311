use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Operating mode for the service.
///
/// Development echoes issued OTP codes back to the caller so clients can be
/// exercised without an SMS gateway; production never returns or logs a
/// code in plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

/// Application configuration loaded from environment variables.
///
/// Loaded once at startup and injected into the pieces that need it; the
/// business logic never reads the process environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub app_env: AppEnv,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing signing secret is a startup failure, never a per-request
    /// error.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "rozgar-api".to_string()),
            app_env: AppEnv::parse(&env::var("APP_ENV").unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_env_parse() {
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("development"), AppEnv::Development);
        assert_eq!(AppEnv::parse(""), AppEnv::Development);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }

    #[test]
    fn test_is_production() {
        assert!(AppEnv::Production.is_production());
        assert!(!AppEnv::Development.is_production());
    }
}
