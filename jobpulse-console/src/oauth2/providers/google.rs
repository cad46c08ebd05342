//! Google OAuth2 provider implementation
//!
//! Google serves both the login flow and the Gmail linking flow. Both ask for
//! offline access with a forced consent prompt so the backend always receives
//! a refresh token.

use url::Url;

use super::base::{scopes_or_default, BaseOAuthProvider};
use crate::oauth2::types::{AuthorizationState, FlowKind, OAuthError, ProviderConfig};

/// Google authorization endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Default scopes for signing in with Google
pub const GOOGLE_LOGIN_SCOPES: &[&str] = &[
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/gmail.send",
];

/// Default scopes for linking a Gmail account
pub const GOOGLE_LINK_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.send",
    "https://www.googleapis.com/auth/userinfo.email",
];

const GOOGLE_EXTRA_PARAMS: &[(&str, &str)] = &[("access_type", "offline"), ("prompt", "consent")];

/// Google OAuth2 provider
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    base: BaseOAuthProvider,
    login_scopes: Vec<String>,
    link_scopes: Vec<String>,
}

impl GoogleProvider {
    /// Create a new Google OAuth2 provider
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn new(config: &ProviderConfig, redirect_uri: &Url) -> Result<Self, OAuthError> {
        Ok(Self {
            base: BaseOAuthProvider::new(GOOGLE_AUTH_URL, config, redirect_uri)?,
            login_scopes: scopes_or_default(&config.scopes, GOOGLE_LOGIN_SCOPES),
            link_scopes: scopes_or_default(&config.link_scopes, GOOGLE_LINK_SCOPES),
        })
    }

    /// Generate the consent-screen URL for `flow`
    #[must_use]
    pub fn authorization_url(&self, flow: FlowKind, state: &AuthorizationState) -> Url {
        let scopes = match flow {
            FlowKind::Login => &self.login_scopes,
            FlowKind::LinkSecondaryAccount => &self.link_scopes,
        };
        self.base.authorization_url(state, scopes, GOOGLE_EXTRA_PARAMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleProvider {
        let redirect = Url::parse("http://localhost:4200/google/callback").unwrap();
        GoogleProvider::new(&ProviderConfig::new("google-client"), &redirect).unwrap()
    }

    fn query(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_login_url() {
        let state = AuthorizationState::generate();
        let url = provider().authorization_url(FlowKind::Login, &state);

        assert!(url.as_str().starts_with(GOOGLE_AUTH_URL));
        assert_eq!(
            query(&url, "scope").as_deref(),
            Some("openid email profile https://www.googleapis.com/auth/gmail.send")
        );
        assert_eq!(query(&url, "access_type").as_deref(), Some("offline"));
        assert_eq!(query(&url, "prompt").as_deref(), Some("consent"));
        assert_eq!(query(&url, "state").as_deref(), Some(state.as_str()));
    }

    #[test]
    fn test_link_url_uses_sentinel_and_gmail_scopes() {
        let url = provider().authorization_url(
            FlowKind::LinkSecondaryAccount,
            &AuthorizationState::link_sentinel(),
        );

        assert_eq!(query(&url, "state").as_deref(), Some("gmail_connect"));
        assert_eq!(
            query(&url, "scope").as_deref(),
            Some(
                "https://www.googleapis.com/auth/gmail.send https://www.googleapis.com/auth/userinfo.email"
            )
        );
    }

    #[test]
    fn test_configured_scopes_override_defaults() {
        let mut config = ProviderConfig::new("google-client");
        config.scopes = vec!["openid".to_string()];
        let redirect = Url::parse("http://localhost:4200/google/callback").unwrap();
        let provider = GoogleProvider::new(&config, &redirect).unwrap();

        let url = provider.authorization_url(FlowKind::Login, &AuthorizationState::generate());
        assert_eq!(query(&url, "scope").as_deref(), Some("openid"));
    }
}
