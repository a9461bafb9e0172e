//! Authentication and authorization
//!
//! Session-token issuance ([`jwt`]), cookie plumbing ([`session`]) and the
//! request pipeline middleware ([`middleware`]).

pub mod jwt;
pub mod middleware;
pub mod session;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUser, require_role, require_session};
pub use session::{SESSION_COOKIE, clear_session_cookie, session_cookie};
