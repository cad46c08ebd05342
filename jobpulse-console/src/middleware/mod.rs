//! Middleware layers for the console
//!
//! - Route guards for signed-in and signed-out pages

pub mod auth;

pub use auth::{require_guest, require_session, GuardRejection, HOME_PATH, LOGIN_PATH};
