//! Authentication middleware
//!
//! The per-request pipeline: locate the token, verify it, load the user,
//! then (optionally) check the role. Each step either advances the request
//! or terminates it with a 401/403; there are no backward transitions and
//! every request starts over from unauthenticated.
//!
//! | Failure | Response |
//! |---------|----------|
//! | No cookie and no bearer header | 401 E3001 |
//! | Bad signature / malformed token | 401 E3002 |
//! | Expired token | 401 E3003 |
//! | Subject deleted since issuance | 401 E3004 |
//! | Role not in the route allow-list | 403 E2001 |

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::JwtError;
use crate::auth::session::token_from_request;
use crate::core::ServerState;
use crate::db::models::{Role, User, UserProfile};
use crate::security_log;
use crate::utils::AppError;

/// Authenticated user context, injected into request extensions
///
/// Built from a fresh store read, never from the token alone: the role here
/// is authoritative even when the token still carries an older one.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Sanitized profile from the same read; saves handlers a second query
    pub profile: UserProfile,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        let profile = user.profile();
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            profile,
        }
    }
}

/// Session middleware — requires a valid token and a live user
///
/// Runs the extractor and loader halves of the pipeline:
/// 1. locate the token (cookie, then bearer header)
/// 2. verify signature and expiry (synchronous, no I/O)
/// 3. load the user record by the token subject (the one store read)
///
/// On success a [`CurrentUser`] lands in the request extensions for
/// handlers and [`require_role`] layers downstream.
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight never carries credentials
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let Some(token) = token_from_request(&req) else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::Unauthorized);
    };

    let claims = state.jwt_service().verify_token(&token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", req.uri())
        );
        match e {
            JwtError::ExpiredToken => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    })?;

    // The token's role claim is only a hint; re-derive everything from the
    // store so a deleted user or changed role takes effect immediately.
    let user = state.users().find_by_id(&claims.sub).await?;

    let Some(user) = user else {
        security_log!("WARN", "auth_user_gone", user_id = claims.sub.clone());
        return Err(AppError::UserNotFound);
    };

    req.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(req).await)
}

/// Whether `role` is a member of the allow-list
///
/// Both sides are whitespace-trimmed and case-folded, guarding against
/// inconsistent casing between stored and registered values.
fn role_allowed(role: &str, allowed: &[&str]) -> bool {
    let normalized = role.trim().to_ascii_lowercase();
    allowed
        .iter()
        .any(|a| a.trim().to_ascii_lowercase() == normalized)
}

/// Role middleware factory — gates a route to a fixed allow-list
///
/// The allow-list is bound at route-registration time:
///
/// ```ignore
/// Router::new()
///     .route("/api/users", get(handler::list))
///     .layer(middleware::from_fn(require_role(&["admin"])));
/// ```
///
/// Must be layered after [`require_session`]; a missing [`CurrentUser`] is
/// answered with 401 rather than a panic in case the ordering is ever wrong.
pub fn require_role(
    allowed: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            // CORS preflight passes through unauthenticated, matching
            // require_session
            if req.method() == http::Method::OPTIONS {
                return Ok(next.run(req).await);
            }

            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::Unauthorized)?;

            if !role_allowed(user.role.as_str(), allowed) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id.clone(),
                    user_role = user.role.as_str(),
                    allowed = allowed.join(",")
                );
                return Err(AppError::forbidden(format!(
                    "Requires one of roles: {}",
                    allowed.join(", ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_allowed_normalizes_both_sides() {
        assert!(role_allowed("admin", &["admin"]));
        assert!(role_allowed(" Admin ", &["admin"]));
        assert!(role_allowed("ADMIN", &[" admin "]));
        assert!(role_allowed("client", &["admin", "client"]));
        assert!(!role_allowed("client", &["admin"]));
        assert!(!role_allowed("", &["admin"]));
    }

    #[test]
    fn test_empty_allow_list_denies_all() {
        assert!(!role_allowed("admin", &[]));
    }
}
