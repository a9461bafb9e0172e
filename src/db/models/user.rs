//! User model
//!
//! The credential store record plus its outward, sanitized representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of marketplace roles
///
/// Stored lowercase in the `users.role` column. Parsing is
/// case-insensitive and whitespace-trimmed so that values written by older
/// clients (`"Admin"`, `" client "`) still resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Platform operator
    Admin,
    /// Service provider (bids on tasks)
    Tasker,
    /// Task poster; the base role for new registrations
    Client,
    /// Read-only visitor
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tasker => "tasker",
            Role::Client => "client",
            Role::Guest => "guest",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "tasker" => Ok(Role::Tasker),
            "client" => Ok(Role::Client),
            "guest" => Ok(Role::Guest),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// User model matching the `users` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    /// Comma-separated skill list
    pub skills: Option<String>,
    pub rating: Option<f64>,
    pub completed_tasks: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Create user payload (repository input)
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Sanitized, outward-facing profile
///
/// Never carries the password hash. Optional columns are normalized here:
/// absent text becomes empty, absent numerics become zero, the skill list
/// becomes a real list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub rating: f64,
    pub completed_tasks: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build the sanitized profile with null defaults applied
    pub fn profile(&self) -> UserProfile {
        let skills = self
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            bio: self.bio.clone().unwrap_or_default(),
            skills,
            rating: self.rating.unwrap_or(0.0),
            completed_tasks: self.completed_tasks.unwrap_or(0),
            created_at: self.created_at,
        }
    }

    /// Verify a plaintext password against the stored argon2 hash
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a plaintext password with argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            role: Role::Client,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            bio: None,
            skills: None,
            rating: None,
            completed_tasks: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_parse_is_case_insensitive_and_trimmed() {
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("CLIENT".parse::<Role>().unwrap(), Role::Client);
        assert_eq!("tasker".parse::<Role>().unwrap(), Role::Tasker);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_applies_null_defaults() {
        let profile = sample_user().profile();
        assert_eq!(profile.bio, "");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.rating, 0.0);
        assert_eq!(profile.completed_tasks, 0);
    }

    #[test]
    fn test_profile_splits_skills() {
        let mut user = sample_user();
        user.skills = Some("plumbing, wiring , ".to_string());
        user.rating = Some(4.5);
        let profile = user.profile();
        assert_eq!(profile.skills, vec!["plumbing", "wiring"]);
        assert_eq!(profile.rating, 4.5);
    }

    #[test]
    fn test_profile_never_serializes_password_hash() {
        let mut user = sample_user();
        user.password_hash = "argon2-secret".to_string();
        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(!json.contains("argon2-secret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let mut user = sample_user();
        user.password_hash = User::hash_password("secret1").unwrap();
        assert!(user.verify_password("secret1").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }
}
