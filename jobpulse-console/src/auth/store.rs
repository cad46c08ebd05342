//! Session store
//!
//! [`SessionStore`] is the only writer of the current [`Session`]. It persists
//! the token and user projection in durable storage and publishes every change
//! on a `watch` channel; components that only need to read identity hold a
//! [`SessionReader`].

use std::sync::Arc;
use tokio::sync::watch;

use super::session::{Session, SessionError, UserProfile};
use crate::backend::AuthResponse;
use crate::storage::{Batch, Slot, Storage, StorageResult};

/// Writer handle for the current session
#[derive(Clone)]
pub struct SessionStore {
    storage: Storage,
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    /// Load the persisted session (if any) from durable storage
    ///
    /// A session is restored only when both the token and the user projection
    /// are present.
    pub fn load(storage: Storage) -> StorageResult<Self> {
        let token: Option<String> = storage.get(&Slot::Token)?;
        let user: Option<UserProfile> = storage.get(&Slot::User)?;

        let session = match (token, user) {
            (Some(access_token), Some(user)) => Some(Session { access_token, user }),
            _ => None,
        };

        tracing::debug!(restored = session.is_some(), "Loaded persisted session");

        let (tx, _rx) = watch::channel(session);
        Ok(Self {
            storage,
            tx: Arc::new(tx),
        })
    }

    /// Read-only handle following the current session
    #[must_use]
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            rx: self.tx.subscribe(),
        }
    }

    /// Snapshot of the current session
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Signed-in user, if any
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Access token, if any
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.access_token.clone())
    }

    /// Access token of the signed-in user
    pub fn require_token(&self) -> Result<String, SessionError> {
        self.token().ok_or(SessionError::NotAuthenticated)
    }

    /// Whether a user is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Store the result of a successful sign-in
    pub fn set_auth_response(&self, response: &AuthResponse) -> StorageResult<Session> {
        let session = Session::from_auth_response(response);
        let batch = Batch::default()
            .set(&Slot::Token, &session.access_token)?
            .set(&Slot::User, &session.user)?;
        self.storage.apply(batch)?;
        self.tx.send_replace(Some(session.clone()));

        tracing::info!(user_id = session.user.id, "Session established");
        Ok(session)
    }

    /// Replace the user projection of the current session
    pub fn update_user(&self, user: UserProfile) -> Result<(), SessionError> {
        let mut current = self.current().ok_or(SessionError::NotAuthenticated)?;
        self.storage.set(&Slot::User, &user)?;
        current.user = user;
        self.tx.send_replace(Some(current));
        Ok(())
    }

    /// Forget the current session
    pub fn clear(&self) -> StorageResult<()> {
        let batch = Batch::default().clear(&Slot::Token)?.clear(&Slot::User)?;
        self.storage.apply(batch)?;
        if self.tx.send_replace(None).is_some() {
            tracing::info!("Session cleared");
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Read-only view of the current session
#[derive(Debug, Clone)]
pub struct SessionReader {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionReader {
    /// Snapshot of the current session
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Whether a user is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait for the next session change and return the new value
    ///
    /// Returns `None` from the outer option when the store has been dropped.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
