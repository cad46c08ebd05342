//! Base OAuth2 provider implementation with shared logic
//!
//! This module provides `BaseOAuthProvider`, the authorization-URL builder
//! shared by the Google and GitHub providers. The console never sees a client
//! secret or a token endpoint: codes are exchanged by the backend.

use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, CsrfToken, EndpointNotSet, EndpointSet, RedirectUrl,
    Scope,
};
use url::Url;

use crate::oauth2::types::{AuthorizationState, OAuthError, ProviderConfig};

/// Client that only knows the authorization endpoint
type AuthorizeOnlyClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet>;

/// Base OAuth2 provider containing shared logic for all providers
#[derive(Debug, Clone)]
pub struct BaseOAuthProvider {
    client: AuthorizeOnlyClient,
}

impl BaseOAuthProvider {
    /// Create a new base OAuth2 provider
    ///
    /// # Arguments
    ///
    /// * `default_auth_url` - Authorization endpoint used unless the config overrides it
    /// * `config` - Provider configuration containing the client ID
    /// * `redirect_uri` - Resolved callback URL
    ///
    /// # Errors
    ///
    /// Returns error if any URL is invalid
    pub fn new(
        default_auth_url: &str,
        config: &ProviderConfig,
        redirect_uri: &Url,
    ) -> Result<Self, OAuthError> {
        let auth_url = config.auth_url.as_deref().unwrap_or(default_auth_url);

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(AuthUrl::new(auth_url.to_string())?)
            .set_redirect_uri(RedirectUrl::from_url(redirect_uri.clone()));

        Ok(Self { client })
    }

    /// Build the consent-screen URL
    ///
    /// # Arguments
    ///
    /// * `state` - Anti-forgery state to round-trip through the provider
    /// * `scopes` - OAuth scopes to request
    /// * `extra_params` - Provider-specific query parameters
    #[must_use]
    pub fn authorization_url(
        &self,
        state: &AuthorizationState,
        scopes: &[String],
        extra_params: &[(&'static str, &'static str)],
    ) -> Url {
        let token = state.as_str().to_string();
        let mut request = self.client.authorize_url(move || CsrfToken::new(token));

        for scope in scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        for (name, value) in extra_params {
            request = request.add_extra_param(*name, *value);
        }

        let (url, _csrf) = request.url();
        url
    }
}

/// Scopes from configuration, or the provider defaults when none are configured
pub(crate) fn scopes_or_default(configured: &[String], defaults: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        defaults.iter().map(|s| (*s).to_string()).collect()
    } else {
        configured.to_vec()
    }
}
