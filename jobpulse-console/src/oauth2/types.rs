//! Core OAuth2 types and configuration
//!
//! This module defines the foundational types for the authorization-code flow:
//! provider identifiers, flow kinds, the anti-forgery state token, callback
//! parameters and the errors a callback can end in.

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::auth::UserProfile;
use crate::backend::IntegrationStatus;

/// Reserved state value marking the Google account-linking (Gmail connect) flow
pub const LINK_STATE_SENTINEL: &str = "gmail_connect";

/// Number of random bytes in a generated state token
const STATE_TOKEN_BYTES: usize = 32;

/// OAuth2 identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google OAuth2 (also used for the Gmail integration)
    Google,
    /// GitHub OAuth2
    GitHub,
}

impl OAuthProvider {
    /// Every supported provider
    pub const ALL: [Self; 2] = [Self::Google, Self::GitHub];

    /// Get the provider as a string (lowercase)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }

    /// Human-readable provider name used in messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
        }
    }

    /// Console path the provider redirects back to
    #[must_use]
    pub const fn callback_path(self) -> &'static str {
        match self {
            Self::Google => "/google/callback",
            Self::GitHub => "/github/callback",
        }
    }

    /// Whether the provider can attach itself to an already signed-in account
    #[must_use]
    pub const fn supports_linking(self) -> bool {
        matches!(self, Self::Google)
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            _ => Err(OAuthError::UnknownProvider(s.to_string())),
        }
    }
}

/// Which flow an authorization attempt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Establish a new console session
    Login,
    /// Attach the provider to the account that is already signed in
    LinkSecondaryAccount,
}

impl FlowKind {
    /// Derive the flow from the state value carried by a callback
    ///
    /// The link flow is recognised only for providers that support linking and
    /// only when the state equals [`LINK_STATE_SENTINEL`] exactly.
    #[must_use]
    pub fn from_received_state(provider: OAuthProvider, state: Option<&str>) -> Self {
        match state {
            Some(LINK_STATE_SENTINEL) if provider.supports_linking() => Self::LinkSecondaryAccount,
            _ => Self::Login,
        }
    }

    /// Page the user lands on after a successful attempt
    #[must_use]
    pub const fn success_route(self) -> &'static str {
        match self {
            Self::Login => "/dashboard",
            Self::LinkSecondaryAccount => "/profile",
        }
    }

    /// Page offered as the way back after a failed attempt
    #[must_use]
    pub const fn recovery_route(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::LinkSecondaryAccount => "/profile",
        }
    }

    /// Label of the recovery action
    #[must_use]
    pub const fn recovery_label(self) -> &'static str {
        match self {
            Self::Login => "Back to Login",
            Self::LinkSecondaryAccount => "Back to Profile",
        }
    }
}

/// Anti-forgery state token round-tripped through the provider
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationState(String);

impl AuthorizationState {
    /// Generate a fresh token from the OS random number generator
    ///
    /// 32 random bytes, hex-encoded (64 characters).
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; STATE_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// State value used by the account-linking flow
    #[must_use]
    pub fn link_sentinel() -> Self {
        Self(LINK_STATE_SENTINEL.to_string())
    }

    /// Initial state for a flow
    #[must_use]
    pub fn for_flow(flow: FlowKind) -> Self {
        match flow {
            FlowKind::Login => Self::generate(),
            FlowKind::LinkSecondaryAccount => Self::link_sentinel(),
        }
    }

    /// Token value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact string comparison against a received state value
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        self.0 == received
    }
}

// Keep tokens out of logs and panic messages.
impl fmt::Debug for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthorizationState").field(&"[redacted]").finish()
    }
}

/// Query parameters read from a provider redirect
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code
    pub code: Option<String>,
    /// State token echoed back by the provider
    pub state: Option<String>,
    /// Error code from the consent screen (e.g. `access_denied`)
    pub error: Option<String>,
    /// Optional error description
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Authorization code, treating an empty value as absent
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }

    /// State value, treating an empty value as absent
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|s| !s.is_empty())
    }
}

/// A prepared redirect to a provider's consent screen
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    /// Provider being redirected to
    pub provider: OAuthProvider,
    /// Flow the redirect belongs to
    pub flow: FlowKind,
    /// Full authorization URL
    pub url: Url,
}

/// Result of a successfully completed callback
#[derive(Debug, Clone)]
pub enum AuthorizationOutcome {
    /// A new session was established
    SignedIn {
        /// Provider used to sign in
        provider: OAuthProvider,
        /// Identity of the signed-in user
        user: UserProfile,
    },
    /// The provider was attached to the current account
    Linked {
        /// Provider that was linked
        provider: OAuthProvider,
        /// Integration status reported by the backend
        status: IntegrationStatus,
    },
}

impl AuthorizationOutcome {
    /// Flow the outcome belongs to
    #[must_use]
    pub const fn flow(&self) -> FlowKind {
        match self {
            Self::SignedIn { .. } => FlowKind::Login,
            Self::Linked { .. } => FlowKind::LinkSecondaryAccount,
        }
    }

    /// Where the user goes next
    #[must_use]
    pub const fn redirect_to(&self) -> &'static str {
        self.flow().success_route()
    }

    /// Confirmation shown to the user
    #[must_use]
    pub fn success_message(&self) -> String {
        match self {
            Self::SignedIn { provider, .. } => {
                format!("Signed in with {}!", provider.display_name())
            }
            Self::Linked { status, .. } => match &status.gmail_address {
                Some(address) => format!("Gmail connected: {address}"),
                None => "Gmail connected successfully!".to_string(),
            },
        }
    }
}

/// Configuration for an OAuth2 provider
///
/// No client secret lives here: the backend performs the token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth2 client ID
    pub client_id: String,
    /// Redirect URI override; defaults to the console origin plus the provider's callback path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    /// Scopes for the login flow; empty means the provider defaults
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Scopes for the account-linking flow; empty means the provider defaults
    #[serde(default)]
    pub link_scopes: Vec<String>,
    /// Authorization endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    /// Whether callbacks without a `state` parameter are rejected
    #[serde(default = "default_require_state")]
    pub require_state: bool,
}

const fn default_require_state() -> bool {
    true
}

impl ProviderConfig {
    /// Create a provider configuration with defaults for everything but the client ID
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: None,
            scopes: Vec::new(),
            link_scopes: Vec::new(),
            auth_url: None,
            require_state: true,
        }
    }
}

/// OAuth2 configuration for all providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Google OAuth2 configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<ProviderConfig>,
    /// GitHub OAuth2 configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<ProviderConfig>,
}

impl OAuthConfig {
    const fn provider_config(&self, provider: OAuthProvider) -> Option<&ProviderConfig> {
        match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::GitHub => self.github.as_ref(),
        }
    }

    /// Get configuration for a specific provider
    ///
    /// # Errors
    ///
    /// Returns error if the provider is not configured
    pub fn get_provider(&self, provider: OAuthProvider) -> Result<&ProviderConfig, OAuthError> {
        self.provider_config(provider)
            .ok_or(OAuthError::ProviderNotConfigured(provider))
    }

    /// Check if a provider is configured
    #[must_use]
    pub const fn is_provider_configured(&self, provider: OAuthProvider) -> bool {
        self.provider_config(provider).is_some()
    }
}

/// OAuth2 errors
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// The user cancelled, or the provider failed at the consent screen
    #[error("Authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    /// The callback carried no authorization code
    #[error("No authorization code received")]
    MissingCode,

    /// Received state does not match the stored one (potential CSRF attack)
    #[error("OAuth2 state token mismatch (potential CSRF attack)")]
    StateMismatch,

    /// The backend rejected the authorization code
    #[error("Failed to exchange authorization code: {0}")]
    ExchangeFailed(String),

    /// Unknown provider name
    #[error("Unknown OAuth2 provider: {0}")]
    UnknownProvider(String),

    /// Provider not configured
    #[error("OAuth2 provider not configured: {0}")]
    ProviderNotConfigured(OAuthProvider),

    /// The provider does not offer the requested flow
    #[error("{provider} does not support the {flow:?} flow")]
    UnsupportedFlow {
        /// Provider asked for the flow
        provider: OAuthProvider,
        /// Requested flow
        flow: FlowKind,
    },

    /// A configured URL could not be parsed
    #[error("Invalid OAuth2 URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Session-scoped storage failed
    #[error("OAuth2 state storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

impl OAuthError {
    /// Whether this failure ends a callback attempt (as opposed to a setup error)
    #[must_use]
    pub const fn is_callback_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthorizationDenied(_)
                | Self::MissingCode
                | Self::StateMismatch
                | Self::ExchangeFailed(_)
        )
    }

    /// Message shown to the user
    ///
    /// State mismatches get a generic message so the page leaks nothing about
    /// what was stored.
    #[must_use]
    pub fn user_message(&self, provider: OAuthProvider) -> String {
        match self {
            Self::AuthorizationDenied(_) => format!(
                "{} authorization was cancelled or failed.",
                provider.display_name()
            ),
            Self::MissingCode => "No authorization code received.".to_string(),
            Self::StateMismatch => "Invalid state parameter. Please try again.".to_string(),
            Self::ExchangeFailed(reason) => reason.clone(),
            Self::UnknownProvider(_) | Self::ProviderNotConfigured(_) => {
                format!("{} sign-in is not available.", provider.display_name())
            }
            Self::UnsupportedFlow { .. } | Self::InvalidUrl(_) | Self::Storage(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
