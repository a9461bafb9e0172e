//! User repository

use super::{RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Data access for the `users` table
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find a user by email (case-insensitive, the login key)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email.trim().to_ascii_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create a new user
    ///
    /// Email is stored lowercased; the id is assigned here and immutable
    /// afterwards.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = data.email.trim().to_ascii_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{email}' is already registered"
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            role: data.role,
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            bio: None,
            skills: None,
            rating: None,
            completed_tasks: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO users
                (id, email, password_hash, role, first_name, last_name, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Hard delete a user
    ///
    /// Any session token the user still holds keeps verifying until expiry;
    /// the user loader turns it into `UserNotFound` on the next request.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("User {id} not found")));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::Role;

    async fn test_repo() -> UserRepository {
        let db = DbService::in_memory().await.expect("in-memory db");
        UserRepository::new(db.pool)
    }

    fn ada() -> UserCreate {
        UserCreate {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "Ada@X.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Client,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = test_repo().await;
        let created = repo.create(ada()).await.unwrap();
        assert_eq!(created.email, "ada@x.com");
        assert_eq!(created.role, Role::Client);

        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, created.email);

        // Lookup normalizes case the same way create does
        let by_email = repo.find_by_email(" ADA@x.COM ").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = test_repo().await;
        repo.create(ada()).await.unwrap();

        let mut again = ada();
        again.email = "ada@x.com".to_string();
        let err = repo.create(again).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate() {
        let repo = test_repo().await;
        let created = repo.create(ada()).await.unwrap();

        // Reaches the UNIQUE index without the create-time lookup, the way
        // the loser of two concurrent registrations would
        let err: RepoError = sqlx::query(
            r#"INSERT INTO users
                (id, email, password_hash, role, first_name, last_name, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind("another-id")
        .bind(&created.email)
        .bind("hash")
        .bind(Role::Client)
        .bind("Ada")
        .bind("Lovelace")
        .bind(Utc::now())
        .execute(&repo.pool)
        .await
        .unwrap_err()
        .into();

        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_delete_then_lookup_misses() {
        let repo = test_repo().await;
        let created = repo.create(ada()).await.unwrap();

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());

        let err = repo.delete(&created.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
