//! Session cookie handling
//!
//! The session token travels in an HTTP-only cookie for browser clients,
//! with an `Authorization: Bearer` fallback for everything else. The cookie
//! takes precedence when both are present.

use axum::extract::Request;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::core::Config;

/// Session cookie name
pub const SESSION_COOKIE: &str = "session";

/// Locate the session token on a request
///
/// Order: `session` cookie first, then `Authorization: Bearer <token>`.
pub fn token_from_request(req: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(req.headers());
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Build the session cookie for a freshly issued token
///
/// HTTP-only always; `Secure` and `SameSite=Strict` in production,
/// `SameSite=Lax` otherwise so local non-TLS development keeps working.
pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(Duration::days(config.jwt.ttl_days));
    if config.is_production() {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::Strict);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }
    cookie
}

/// Build an expired session cookie (logout)
///
/// Attributes must match [`session_cookie`] or browsers keep the old copy.
/// Nothing is invalidated server-side; the token stays valid until expiry.
pub fn clear_session_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(Duration::ZERO);
    if config.is_production() {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::Strict);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/api/auth/me");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let req = request(&[
            ("cookie", "session=cookie-token; theme=dark"),
            ("authorization", "Bearer header-token"),
        ]);
        assert_eq!(token_from_request(&req).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_bearer_fallback() {
        let req = request(&[("authorization", "Bearer header-token")]);
        assert_eq!(token_from_request(&req).as_deref(), Some("header-token"));
    }

    #[test]
    fn test_no_credential() {
        assert_eq!(token_from_request(&request(&[])), None);
        // Basic auth is not a session credential
        let req = request(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(token_from_request(&req), None);
    }

    #[test]
    fn test_empty_cookie_falls_back_to_bearer() {
        let req = request(&[
            ("cookie", "session="),
            ("authorization", "Bearer header-token"),
        ]);
        assert_eq!(token_from_request(&req).as_deref(), Some("header-token"));
    }

    fn config(environment: &str) -> Config {
        let mut config = crate::core::ServerState::test_config();
        config.environment = environment.to_string();
        config
    }

    #[test]
    fn test_production_cookie_is_secure_and_strict() {
        let cookie = session_cookie("tok".to_string(), &config("production"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_development_cookie_is_lax_without_secure() {
        let cookie = session_cookie("tok".to_string(), &config("development"));
        assert_eq!(cookie.secure(), None);
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_clear_cookie_attributes_match_session_cookie() {
        for environment in ["development", "production"] {
            let config = config(environment);
            let set = session_cookie("tok".to_string(), &config);
            let clear = clear_session_cookie(&config);

            assert_eq!(clear.value(), "");
            assert_eq!(clear.max_age(), Some(Duration::ZERO));
            // Browsers only drop the cookie when these line up
            assert_eq!(clear.name(), set.name());
            assert_eq!(clear.path(), set.path());
            assert_eq!(clear.http_only(), set.http_only());
            assert_eq!(clear.secure(), set.secure());
            assert_eq!(clear.same_site(), set.same_site());
        }
    }
}
