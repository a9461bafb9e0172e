//! Authentication handlers
//!
//! Register, login, current-user and logout. Register and login are the two
//! places a session token is issued; it is delivered both as the session
//! cookie and in the response body for non-cookie clients.

use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, clear_session_cookie, session_cookie};
use crate::core::ServerState;
use crate::db::models::{Role, UserCreate, UserProfile};
use crate::security_log;
use crate::utils::validation::{MAX_NAME_LEN, validate_email, validate_password, validate_required_text};
use crate::utils::AppError;

/// Register request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Register response (201)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub ok: bool,
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Register handler
///
/// Creates the account with the base non-privileged role and logs the new
/// user straight in. Role is never taken from the request.
pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<RegisterResponse>), AppError> {
    validate_required_text(&req.first_name, "firstName", MAX_NAME_LEN)?;
    validate_required_text(&req.last_name, "lastName", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let user = state
        .users()
        .create(UserCreate {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            role: Role::Client,
        })
        .await?;

    let token = state
        .jwt_service()
        .issue_token(&user.id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered");

    let jar = jar.add(session_cookie(token.clone(), &state.config));
    let response = RegisterResponse {
        message: "Account created".to_string(),
        user_id: user.id,
        email: user.email,
        role: user.role,
        token,
    };

    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// Login handler
///
/// Verifies credentials against the stored argon2 hash and issues a fresh
/// session token. Unknown email and wrong password are indistinguishable in
/// the response, and no cookie is set on failure.
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let user = state
        .users()
        .find_by_email(&req.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        security_log!("WARN", "login_failed", email = user.email.clone());
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service()
        .issue_token(&user.id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        role = %user.role,
        "User logged in"
    );

    let jar = jar.add(session_cookie(token.clone(), &state.config));
    let response = LoginResponse {
        ok: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
        token,
    };

    Ok((jar, Json(response)))
}

/// Current-user handler
///
/// Returns the sanitized profile loaded by the session middleware; the
/// password hash never leaves the model layer.
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserProfile> {
    Json(user.profile)
}

/// Logout handler
///
/// Clears the session cookie. Tokens are stateless, so nothing is revoked
/// server-side; a copied token stays valid until it expires.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    tracing::info!(user_id = %user.id, email = %user.email, "User logged out");

    let jar = jar.add(clear_session_cookie(&state.config));
    (jar, Json(LogoutResponse { ok: true }))
}
