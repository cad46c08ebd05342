//! OAuth2 authorization-code coordinator
//!
//! [`OAuthCoordinator`] owns both halves of an authorization attempt:
//!
//! 1. [`OAuthCoordinator::begin_authorization`] mints an anti-forgery state,
//!    stores it in the provider's session-scoped slot and returns the consent
//!    URL the browser is sent to.
//! 2. [`OAuthCoordinator::complete_authorization`] handles the provider's
//!    redirect back: it consumes the stored state, verifies it, and asks the
//!    backend to exchange the code, either for a new session (login) or for
//!    Gmail tokens on the signed-in account (linking).
//!
//! The flow of a Google callback is recovered from the state itself: the
//! reserved value `gmail_connect` marks the linking flow.

use oauth2::AuthorizationCode;
use std::sync::Arc;
use url::Url;

use super::attempt::{Attempt, AttemptPhase};
use super::providers::ProviderRegistry;
use super::types::{
    AuthorizationOutcome, AuthorizationRedirect, AuthorizationState, CallbackParams, FlowKind,
    OAuthConfig, OAuthError, OAuthProvider,
};
use crate::auth::SessionStore;
use crate::backend::{BackendApi, BackendError};
use crate::notify::Notifier;
use crate::storage::{Slot, Storage};

/// Drives OAuth2 authorization attempts for every configured provider
#[derive(Clone)]
pub struct OAuthCoordinator {
    config: Arc<OAuthConfig>,
    providers: Arc<ProviderRegistry>,
    storage: Storage,
    sessions: SessionStore,
    notifier: Notifier,
    backend: Arc<dyn BackendApi>,
}

impl OAuthCoordinator {
    /// Create a coordinator
    ///
    /// `origin` is the public origin of the console, used to derive default
    /// redirect URIs.
    ///
    /// # Errors
    ///
    /// Returns error if a configured provider URL is invalid
    pub fn new(
        config: OAuthConfig,
        origin: &Url,
        storage: Storage,
        sessions: SessionStore,
        notifier: Notifier,
        backend: Arc<dyn BackendApi>,
    ) -> Result<Self, OAuthError> {
        let providers = ProviderRegistry::from_config(&config, origin)?;
        Ok(Self {
            config: Arc::new(config),
            providers: Arc::new(providers),
            storage,
            sessions,
            notifier,
            backend,
        })
    }

    /// Whether `provider` can be used
    #[must_use]
    pub fn is_configured(&self, provider: OAuthProvider) -> bool {
        self.config.is_provider_configured(provider)
    }

    /// Start an authorization attempt
    ///
    /// Replaces any state previously stored for `provider`: only the most
    /// recent attempt per provider can complete.
    ///
    /// # Errors
    ///
    /// Returns error if the provider is not configured, does not support
    /// `flow`, or the state cannot be stored
    pub fn begin_authorization(
        &self,
        provider: OAuthProvider,
        flow: FlowKind,
    ) -> Result<AuthorizationRedirect, OAuthError> {
        self.config.get_provider(provider)?;
        if flow == FlowKind::LinkSecondaryAccount && !provider.supports_linking() {
            return Err(OAuthError::UnsupportedFlow { provider, flow });
        }

        let mut attempt = Attempt::begin(provider, flow);
        let state = AuthorizationState::for_flow(flow);
        let url = self.providers.authorization_url(provider, flow, &state)?;

        self.storage.set(&Slot::OAuthState(provider), &state)?;
        attempt.advance(AttemptPhase::Redirecting);

        tracing::info!(provider = %provider, flow = ?flow, "Redirecting to OAuth2 provider");

        Ok(AuthorizationRedirect {
            provider,
            flow,
            url,
        })
    }

    /// Finish an authorization attempt from the provider's callback parameters
    ///
    /// Checks run in a fixed order: provider error, missing code, state
    /// verification, code exchange. The stored state is consumed before any
    /// check, so it is gone whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::AuthorizationDenied`], [`OAuthError::MissingCode`],
    /// [`OAuthError::StateMismatch`] or [`OAuthError::ExchangeFailed`] for a
    /// failed callback, and [`OAuthError::Storage`] if the new session cannot
    /// be persisted.
    pub async fn complete_authorization(
        &self,
        provider: OAuthProvider,
        params: &CallbackParams,
    ) -> Result<AuthorizationOutcome, OAuthError> {
        let flow = FlowKind::from_received_state(provider, params.state());
        let mut attempt = Attempt::from_callback(provider, flow);

        match self.run_callback(&mut attempt, provider, params).await {
            Ok(outcome) => {
                attempt.advance(AttemptPhase::Succeeded);
                tracing::info!(provider = %provider, flow = ?flow, "OAuth2 authorization completed");
                self.notifier.success(outcome.success_message());
                Ok(outcome)
            }
            Err(e) => {
                let failed_at = attempt.phase();
                attempt.advance(AttemptPhase::Failed);
                tracing::warn!(
                    provider = %provider,
                    flow = ?flow,
                    phase = %failed_at,
                    error = %e,
                    "OAuth2 authorization failed"
                );
                Err(e)
            }
        }
    }

    async fn run_callback(
        &self,
        attempt: &mut Attempt,
        provider: OAuthProvider,
        params: &CallbackParams,
    ) -> Result<AuthorizationOutcome, OAuthError> {
        let stored = self.take_stored_state(provider);

        if let Some(error) = params.error.as_deref() {
            return Err(OAuthError::AuthorizationDenied(
                params
                    .error_description
                    .clone()
                    .unwrap_or_else(|| error.to_string()),
            ));
        }

        let code = params
            .code()
            .map(|c| AuthorizationCode::new(c.to_string()))
            .ok_or(OAuthError::MissingCode)?;

        attempt.advance(AttemptPhase::VerifyingState);
        self.verify_state(provider, attempt.flow(), params.state(), stored.as_ref())?;

        attempt.advance(AttemptPhase::ExchangingCode);
        match attempt.flow() {
            FlowKind::Login => self.sign_in(provider, &code).await,
            FlowKind::LinkSecondaryAccount => self.link_account(provider, &code).await,
        }
    }

    fn take_stored_state(&self, provider: OAuthProvider) -> Option<AuthorizationState> {
        match self.storage.take(&Slot::OAuthState(provider)) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(provider = %provider, error = %e, "Unreadable stored OAuth2 state");
                None
            }
        }
    }

    fn verify_state(
        &self,
        provider: OAuthProvider,
        flow: FlowKind,
        received: Option<&str>,
        stored: Option<&AuthorizationState>,
    ) -> Result<(), OAuthError> {
        match (received, stored) {
            (Some(received), Some(stored)) if stored.matches(received) => Ok(()),
            (None, _) if !self.requires_state(provider) => {
                tracing::debug!(provider = %provider, "Callback without state accepted by configuration");
                Ok(())
            }
            _ => {
                tracing::warn!(
                    target: "security",
                    provider = %provider,
                    flow = ?flow,
                    received_present = received.is_some(),
                    stored_present = stored.is_some(),
                    "OAuth2 state mismatch (potential CSRF attack)"
                );
                Err(OAuthError::StateMismatch)
            }
        }
    }

    fn requires_state(&self, provider: OAuthProvider) -> bool {
        self.config
            .get_provider(provider)
            .ok()
            .is_none_or(|c| c.require_state)
    }

    async fn sign_in(
        &self,
        provider: OAuthProvider,
        code: &AuthorizationCode,
    ) -> Result<AuthorizationOutcome, OAuthError> {
        let response = self
            .backend
            .exchange_oauth_code(provider, code.secret())
            .await
            .map_err(|e| exchange_failed(&e, &format!("{} sign-in failed.", provider.display_name())))?;

        let session = self.sessions.set_auth_response(&response)?;
        Ok(AuthorizationOutcome::SignedIn {
            provider,
            user: session.user,
        })
    }

    async fn link_account(
        &self,
        provider: OAuthProvider,
        code: &AuthorizationCode,
    ) -> Result<AuthorizationOutcome, OAuthError> {
        let token = self
            .sessions
            .require_token()
            .map_err(|_| OAuthError::ExchangeFailed("Sign in before connecting Gmail.".to_string()))?;

        let status = self
            .backend
            .connect_gmail(&token, code.secret())
            .await
            .map_err(|e| exchange_failed(&e, "Failed to connect Gmail account."))?;

        Ok(AuthorizationOutcome::Linked { provider, status })
    }
}

impl std::fmt::Debug for OAuthCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCoordinator")
            .field("providers", &self.providers)
            .finish_non_exhaustive()
    }
}

fn exchange_failed(error: &BackendError, fallback: &str) -> OAuthError {
    tracing::debug!(error = %error, "Backend rejected authorization code");
    OAuthError::ExchangeFailed(
        error
            .api_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string(),
    )
}
