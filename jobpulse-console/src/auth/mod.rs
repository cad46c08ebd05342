//! Console sessions and password authentication
//!
//! The console keeps at most one signed-in user. [`SessionStore`] is the only
//! writer of the session slots; everything else reads through it.

pub mod service;
pub mod session;
pub mod store;

pub use service::{AuthError, AuthService, LoginForm, RegisterForm};
pub(crate) use service::first_validation_message;
pub use session::{Session, SessionError, UserProfile};
pub use store::{SessionReader, SessionStore};
