//! Session token service
//!
//! Issues and verifies the signed, time-limited session tokens that prove a
//! prior login. Tokens are stateless: nothing is persisted server-side and
//! the only invalidation is expiry or the client discarding its copy.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Role;

/// Session token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in days; expiry is absolute, no sliding renewal
    pub ttl_days: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl JwtConfig {
    /// Load the token configuration from the environment
    ///
    /// `SESSION_SECRET` is required in production and the process must not
    /// start without it. Outside production a random printable secret is
    /// generated with a warning, which also means sessions do not survive a
    /// restart in development.
    pub fn from_env(production: bool) -> Result<Self, JwtError> {
        let secret = load_session_secret(production)?;
        Ok(Self {
            secret,
            ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            issuer: std::env::var("SESSION_ISSUER")
                .unwrap_or_else(|_| "taskhub-server".to_string()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "taskhub-web".to_string()),
        })
    }
}

/// Claims embedded in the session token
///
/// The `role` claim is a hint only: the user loader re-derives the
/// authoritative role from a fresh store read on every request, so a
/// long-lived token cannot carry a stale role past the middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject)
    pub sub: String,
    /// Login email at issuance time
    pub email: String,
    /// Role at issuance time
    pub role: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// Token errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generate a random printable secret (development fallback)
fn generate_printable_secret() -> Result<String, JwtError> {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let chars: Vec<char> = allowed_chars.chars().collect();

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::KeyGenerationFailed("Secure RNG unavailable".to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| chars[(*b as usize) % chars.len()])
        .collect())
}

/// Load the signing secret from the environment
fn load_session_secret(production: bool) -> Result<String, JwtError> {
    match std::env::var("SESSION_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "SESSION_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) if production => Err(JwtError::ConfigError(
            "SESSION_SECRET must be set in production".to_string(),
        )),
        Err(_) => {
            tracing::warn!(
                "SESSION_SECRET not set; generating a temporary development secret. \
                 Sessions will not survive a restart."
            );
            generate_printable_secret()
        }
    }
}

/// Session token service
///
/// Keys are derived from the secret once at startup; issuing and verifying
/// are synchronous, CPU-bound signature operations with no I/O.
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a signed session token for a verified user
    ///
    /// Expiry is fixed at issuance time + configured lifetime.
    pub fn issue_token(&self, user_id: &str, email: &str, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::days(self.config.ttl_days);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Verify and decode a session token
    ///
    /// Read-only and idempotent: verifying the same token twice yields the
    /// same claims. Expiry is a wall-clock comparison with zero leeway.
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-test-secret-test-secret!".to_string(),
            ttl_days: 7,
            issuer: "taskhub-server".to_string(),
            audience: "taskhub-web".to_string(),
        }
    }

    fn service() -> JwtService {
        JwtService::new(test_config())
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = service();
        let token = service.issue_token("u-1", "a@x.com", Role::Client).unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, "client");
        assert_eq!(claims.exp, claims.iat + 7 * 24 * 3600);
    }

    #[test]
    fn test_verification_is_idempotent() {
        let service = service();
        let token = service.issue_token("u-1", "a@x.com", Role::Tasker).unwrap();

        let first = service.verify_token(&token).unwrap();
        let second = service.verify_token(&token).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config();
        config.ttl_days = -1;
        let expired = JwtService::new(config)
            .issue_token("u-1", "a@x.com", Role::Client)
            .unwrap();

        // Same key, so only the expiry can fail
        let err = service().verify_token(&expired).unwrap_err();
        assert!(matches!(err, JwtError::ExpiredToken));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let token = service.issue_token("u-1", "a@x.com", Role::Client).unwrap();

        // Flip part of the payload segment, keep the signature
        let mut parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let tampered_payload = parts[1].to_string().replace(
            parts[1].chars().next().unwrap(),
            if parts[1].starts_with('A') { "B" } else { "A" },
        );
        parts[1] = &tampered_payload;
        let tampered = parts.join(".");

        assert!(service.verify_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = service().issue_token("u-1", "a@x.com", Role::Client).unwrap();

        let mut other_config = test_config();
        other_config.secret = "another-secret-another-secret-another!".to_string();
        let other = JwtService::new(other_config);

        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_generated_dev_secret_is_long_enough() {
        let secret = generate_printable_secret().unwrap();
        assert_eq!(secret.len(), 64);
        assert!(secret.is_ascii());
    }
}
