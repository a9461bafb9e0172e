//! Server configuration
//!
//! All knobs come from environment variables, read once at startup.
//!
//! | Variable | Default | Notes |
//! |----------|---------|-------|
//! | ENVIRONMENT | development | development \| staging \| production |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATABASE_PATH | taskhub.db | SQLite file |
//! | SESSION_SECRET | - | required in production, >= 32 chars |
//! | SESSION_TTL_DAYS | 7 | token and cookie lifetime |
//!
//! `LOG_DIR` is read directly by `main` before configuration loads, so the
//! development-secret warning has somewhere to go.

use crate::auth::{JwtConfig, JwtError};

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database path
    pub database_path: String,
    /// Session token configuration
    pub jwt: JwtConfig,
    /// Deployment environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// The only fatal outcome is a missing or too-short `SESSION_SECRET` in
    /// production; everything else falls back to defaults.
    pub fn from_env() -> Result<Self, JwtError> {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let production = environment == "production";

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "taskhub.db".to_string()),
            jwt: JwtConfig::from_env(production)?,
            environment,
        })
    }

    /// Whether cookie security attributes should be enforced
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
