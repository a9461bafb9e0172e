//! TaskHub Server - account and session core of the TaskHub marketplace
//!
//! # Architecture
//!
//! TaskHub is a two-sided services marketplace (task posters and service
//! providers). This crate is its account backbone: credential storage,
//! session-token issuance and the per-request authentication pipeline.
//! Every request to a protected route flows through:
//!
//! ```text
//! request -> session extractor -> user loader -> role authorizer -> handler
//! ```
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/     # configuration, state, server
//! ├── auth/     # session tokens, cookies, pipeline middleware
//! ├── db/       # SQLite service, models, repositories
//! ├── api/      # HTTP routes and handlers
//! └── utils/    # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{Claims, CurrentUser, JwtConfig, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - auth events on the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
