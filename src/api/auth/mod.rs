//! Authentication routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/register | POST | public |
//! | /api/auth/login | POST | public |
//! | /api/auth/me | GET | session |
//! | /api/auth/logout | POST | session |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_session;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login));

    let session_routes = Router::new()
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
        .layer(middleware::from_fn_with_state(state, require_session));

    public_routes.merge(session_routes)
}
