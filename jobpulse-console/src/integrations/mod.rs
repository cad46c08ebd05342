//! Gmail integration
//!
//! Email jobs can send through the user's own Gmail account. Connecting runs
//! the Google account-linking flow of [`OAuthCoordinator`]; status and
//! disconnect go straight to the backend.

use std::sync::Arc;

use crate::auth::{SessionError, SessionStore};
use crate::backend::{BackendApi, BackendError, IntegrationStatus};
use crate::notify::Notifier;
use crate::oauth2::{AuthorizationRedirect, FlowKind, OAuthCoordinator, OAuthError, OAuthProvider};

/// Gmail status, connect and disconnect
#[derive(Clone)]
pub struct GmailIntegration {
    backend: Arc<dyn BackendApi>,
    sessions: SessionStore,
    oauth: OAuthCoordinator,
    notifier: Notifier,
}

impl GmailIntegration {
    /// Create the integration
    #[must_use]
    pub fn new(
        backend: Arc<dyn BackendApi>,
        sessions: SessionStore,
        oauth: OAuthCoordinator,
        notifier: Notifier,
    ) -> Self {
        Self {
            backend,
            sessions,
            oauth,
            notifier,
        }
    }

    /// Current Gmail status of the signed-in account
    pub async fn status(&self) -> Result<IntegrationStatus, IntegrationError> {
        let token = self.sessions.require_token()?;
        Ok(self.backend.gmail_status(&token).await?)
    }

    /// Start linking a Gmail account to the signed-in account
    ///
    /// The returned redirect carries the link sentinel as its state; the Google
    /// callback completes the link.
    pub fn connect(&self) -> Result<AuthorizationRedirect, IntegrationError> {
        self.sessions.require_token()?;
        self.oauth
            .begin_authorization(OAuthProvider::Google, FlowKind::LinkSecondaryAccount)
            .map_err(|e| {
                tracing::warn!(error = %e, "Could not start Gmail connection");
                self.notifier.error("Failed to start Gmail connection.");
                IntegrationError::OAuth(e)
            })
    }

    /// Disconnect Gmail from the signed-in account
    pub async fn disconnect(&self) -> Result<IntegrationStatus, IntegrationError> {
        let token = self.sessions.require_token()?;

        match self.backend.disconnect_gmail(&token).await {
            Ok(()) => {
                tracing::info!("Gmail disconnected");
                self.notifier.success("Gmail disconnected.");
                Ok(IntegrationStatus::default())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Gmail disconnect failed");
                self.notifier.error("Failed to disconnect Gmail.");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for GmailIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailIntegration").finish_non_exhaustive()
    }
}

/// Gmail integration errors
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// No user is signed in
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The link flow could not be started
    #[error(transparent)]
    OAuth(#[from] OAuthError),
}
