//! GitHub OAuth2 provider implementation

use url::Url;

use super::base::{scopes_or_default, BaseOAuthProvider};
use crate::oauth2::types::{AuthorizationState, OAuthError, ProviderConfig};

/// GitHub authorization endpoint
pub const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";

/// Default scopes for signing in with GitHub
pub const GITHUB_LOGIN_SCOPES: &[&str] = &["read:user", "user:email"];

/// GitHub OAuth2 provider
///
/// GitHub is a login-only provider.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    base: BaseOAuthProvider,
    scopes: Vec<String>,
}

impl GitHubProvider {
    /// Create a new GitHub OAuth2 provider
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn new(config: &ProviderConfig, redirect_uri: &Url) -> Result<Self, OAuthError> {
        Ok(Self {
            base: BaseOAuthProvider::new(GITHUB_AUTH_URL, config, redirect_uri)?,
            scopes: scopes_or_default(&config.scopes, GITHUB_LOGIN_SCOPES),
        })
    }

    /// Generate the consent-screen URL
    #[must_use]
    pub fn authorization_url(&self, state: &AuthorizationState) -> Url {
        self.base.authorization_url(state, &self.scopes, &[])
    }
}
