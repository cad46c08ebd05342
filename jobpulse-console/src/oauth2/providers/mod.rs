//! OAuth2 provider implementations
//!
//! This module contains the authorization-URL builders for:
//! - Google OAuth2 (login and Gmail linking)
//! - GitHub OAuth2 (login only)
//!
//! Both providers use a shared `BaseOAuthProvider`. [`ProviderRegistry`] holds
//! one builder per configured provider.

pub mod base;
pub mod github;
pub mod google;

use url::Url;

pub use base::BaseOAuthProvider;
pub use github::GitHubProvider;
pub use google::GoogleProvider;

use crate::oauth2::types::{
    AuthorizationState, FlowKind, OAuthConfig, OAuthError, OAuthProvider, ProviderConfig,
};

/// Authorization-URL builders for every configured provider
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    google: Option<GoogleProvider>,
    github: Option<GitHubProvider>,
}

impl ProviderRegistry {
    /// Build the registry from configuration
    ///
    /// `origin` is the public origin of the console; redirect URIs default to
    /// the origin joined with each provider's callback path.
    ///
    /// # Errors
    ///
    /// Returns error if a configured URL is invalid
    pub fn from_config(config: &OAuthConfig, origin: &Url) -> Result<Self, OAuthError> {
        let google = config
            .google
            .as_ref()
            .map(|c| GoogleProvider::new(c, &redirect_uri(c, origin, OAuthProvider::Google)?))
            .transpose()?;
        let github = config
            .github
            .as_ref()
            .map(|c| GitHubProvider::new(c, &redirect_uri(c, origin, OAuthProvider::GitHub)?))
            .transpose()?;

        Ok(Self { google, github })
    }

    /// Consent-screen URL for `provider` and `flow`
    ///
    /// # Errors
    ///
    /// Returns error if the provider is not configured or does not support
    /// the flow
    pub fn authorization_url(
        &self,
        provider: OAuthProvider,
        flow: FlowKind,
        state: &AuthorizationState,
    ) -> Result<Url, OAuthError> {
        match provider {
            OAuthProvider::Google => self
                .google
                .as_ref()
                .map(|google| google.authorization_url(flow, state))
                .ok_or(OAuthError::ProviderNotConfigured(provider)),
            OAuthProvider::GitHub => {
                if flow != FlowKind::Login {
                    return Err(OAuthError::UnsupportedFlow { provider, flow });
                }
                self.github
                    .as_ref()
                    .map(|github| github.authorization_url(state))
                    .ok_or(OAuthError::ProviderNotConfigured(provider))
            }
        }
    }
}

fn redirect_uri(
    config: &ProviderConfig,
    origin: &Url,
    provider: OAuthProvider,
) -> Result<Url, OAuthError> {
    match &config.redirect_uri {
        Some(uri) => Ok(Url::parse(uri)?),
        None => Ok(origin.join(provider.callback_path())?),
    }
}
