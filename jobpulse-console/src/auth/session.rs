//! Session types
//!
//! A [`Session`] is the access token plus the minimal identity projection the
//! console needs to render pages.

use serde::{Deserialize, Serialize};

use crate::backend::AuthResponse;

/// Identity projection of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user ID
    pub id: i64,
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Role name (e.g. `USER`, `ADMIN`)
    pub role: String,
}

/// Authenticated console session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Backend access token
    pub access_token: String,
    /// Signed-in user
    pub user: UserProfile,
}

impl Session {
    /// Project a backend authentication response onto a session
    #[must_use]
    pub fn from_auth_response(response: &AuthResponse) -> Self {
        Self {
            access_token: response.access_token.clone(),
            user: response.user.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

/// Session-related errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No user is signed in
    #[error("Not signed in")]
    NotAuthenticated,

    /// Persisting the session failed
    #[error("Session storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}
