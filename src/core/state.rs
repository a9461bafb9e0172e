//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs: the
//! configuration, the database service and the token service. It is built
//! once at startup and cloned into the router; clones are shallow
//! (`Arc`/pool handles), so per-request cost is negligible. No component
//! reaches for globals — everything downstream receives its dependencies
//! from here.

use std::sync::Arc;

use crate::auth::{JwtConfig, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database and assemble the state
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config, db))
    }

    /// Assemble the state around an existing database service
    ///
    /// Used by tests with an in-memory store.
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config: Arc::new(config),
            db,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn users(&self) -> UserRepository {
        self.db.users()
    }

    /// Test configuration with a fixed secret and in-memory-friendly defaults
    pub fn test_config() -> Config {
        Config {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt: JwtConfig {
                secret: "integration-test-secret-integration-test".to_string(),
                ttl_days: 7,
                issuer: "taskhub-server".to_string(),
                audience: "taskhub-web".to_string(),
            },
            environment: "development".to_string(),
        }
    }
}
