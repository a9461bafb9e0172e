//! Account administration routes
//!
//! All routes here are restricted to the `admin` role; they exist for
//! platform operators and double as the reference use of [`require_role`].
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/users | GET | admin |
//! | /api/users/{id} | GET | admin |
//! | /api/users/{id} | DELETE | admin |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{require_role, require_session};
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/users", get(handler::list))
        .route(
            "/api/users/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_role(&["admin"])))
        .layer(middleware::from_fn_with_state(state, require_session))
}
