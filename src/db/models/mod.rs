//! Database models

mod user;

pub use user::{Role, User, UserCreate, UserProfile};
