//! API route modules
//!
//! - [`auth`] - register, login, current user, logout
//! - [`users`] - account administration (admin only)
//! - [`health`] - health check

pub mod auth;
pub mod health;
pub mod users;
