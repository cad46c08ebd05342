//! Password sign-in, registration and sign-out
//!
//! OAuth sign-in lives in [`crate::oauth2`]; both paths end in
//! [`SessionStore::set_auth_response`].

use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::session::{Session, SessionError, UserProfile};
use super::store::SessionStore;
use crate::backend::{BackendApi, BackendError, LoginRequest, RegisterRequest};
use crate::notify::Notifier;
use crate::storage::StorageError;

/// Login form data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    /// Login name
    #[validate(length(min = 1, message = "Please fill in all fields."))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Please fill in all fields."))]
    pub password: String,
}

/// Registration form data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    /// Login name (3 to 50 characters)
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters."))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    /// Password (min 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

/// Password authentication against the backend
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn BackendApi>,
    sessions: SessionStore,
    notifier: Notifier,
}

impl AuthService {
    /// Create the service
    #[must_use]
    pub fn new(backend: Arc<dyn BackendApi>, sessions: SessionStore, notifier: Notifier) -> Self {
        Self {
            backend,
            sessions,
            notifier,
        }
    }

    /// Sign in with username and password
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        form.validate()?;

        let request = LoginRequest {
            username: form.username.trim().to_string(),
            password: form.password.clone(),
        };
        let response = self
            .backend
            .login(&request)
            .await
            .map_err(|e| AuthError::rejected(&e, "Invalid credentials."))?;

        let session = self.sessions.set_auth_response(&response)?;
        self.notifier.success("Welcome back!");
        Ok(session)
    }

    /// Create an account and sign in with it
    pub async fn register(&self, form: &RegisterForm) -> Result<Session, AuthError> {
        form.validate()?;

        let request = RegisterRequest {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        let response = self
            .backend
            .register(&request)
            .await
            .map_err(|e| AuthError::rejected(&e, "Registration failed."))?;

        let session = self.sessions.set_auth_response(&response)?;
        self.notifier.success("Account created!");
        Ok(session)
    }

    /// Re-read the signed-in user from the backend
    ///
    /// A token the backend no longer accepts ends the session.
    pub async fn refresh_profile(&self) -> Result<UserProfile, AuthError> {
        let token = self.sessions.require_token()?;

        match self.backend.me(&token).await {
            Ok(user) => {
                self.sessions.update_user(user.clone())?;
                Ok(user)
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Backend rejected the session token, signing out");
                self.sessions.clear()?;
                Err(AuthError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sign out
    pub fn logout(&self) -> Result<(), AuthError> {
        let was_signed_in = self.sessions.is_authenticated();
        self.sessions.clear()?;
        if was_signed_in {
            self.notifier.info("You have been signed out.");
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

/// Password authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The form failed validation
    #[error("{}", first_validation_message(.0))]
    Validation(#[from] validator::ValidationErrors),

    /// The backend refused the request
    #[error("{0}")]
    Rejected(String),

    /// The backend no longer accepts the session token
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Backend error outside a sign-in attempt
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl AuthError {
    fn rejected(error: &BackendError, fallback: &str) -> Self {
        tracing::debug!(error = %error, "Backend rejected credentials");
        Self::Rejected(
            error
                .api_message()
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback)
                .to_string(),
        )
    }

    /// Whether the error is the user's to fix (shown on the form)
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Rejected(_) | Self::SessionExpired
        )
    }
}

pub(crate) fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Invalid form input.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AuthResponse, MockBackendApi};
    use crate::storage::Storage;

    fn auth_response() -> AuthResponse {
        serde_json::from_value(serde_json::json!({
            "accessToken": "jwt",
            "user": {"id": 3, "username": "grace", "email": "grace@example.com", "role": "USER"}
        }))
        .unwrap()
    }

    fn service(backend: MockBackendApi) -> (AuthService, SessionStore, Notifier) {
        let sessions = SessionStore::load(Storage::in_memory()).unwrap();
        let notifier = Notifier::new();
        let service = AuthService::new(Arc::new(backend), sessions.clone(), notifier.clone());
        (service, sessions, notifier)
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_sets_session() {
        let mut backend = MockBackendApi::new();
        backend
            .expect_login()
            .withf(|r| r.username == "grace" && r.password == "secret")
            .returning(|_| Ok(auth_response()));
        let (service, sessions, notifier) = service(backend);

        service.login(&login_form(" grace ", "secret")).await.unwrap();

        assert_eq!(sessions.token().as_deref(), Some("jwt"));
        assert_eq!(notifier.take_pending()[0].message, "Welcome back!");
    }

    #[tokio::test]
    async fn test_login_empty_fields_never_reach_backend() {
        let (service, _, _) = service(MockBackendApi::new());
        let err = service.login(&login_form("", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(err.to_string(), "Please fill in all fields.");
    }

    #[tokio::test]
    async fn test_login_rejection_uses_backend_message() {
        let mut backend = MockBackendApi::new();
        backend.expect_login().returning(|_| {
            Err(BackendError::Api {
                status: 401,
                message: "Bad credentials".to_string(),
            })
        });
        let (service, sessions, _) = service(backend);

        let err = service.login(&login_form("grace", "wrong")).await.unwrap_err();
        assert_eq!(err.to_string(), "Bad credentials");
        assert!(!sessions.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejection_fallback() {
        let mut backend = MockBackendApi::new();
        backend.expect_login().returning(|_| {
            Err(BackendError::Api {
                status: 500,
                message: String::new(),
            })
        });
        let (service, _, _) = service(backend);

        let err = service.login(&login_form("grace", "wrong")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials.");
    }

    #[tokio::test]
    async fn test_register_validates_lengths() {
        let (service, _, _) = service(MockBackendApi::new());
        let form = RegisterForm {
            username: "gr".to_string(),
            email: "grace@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            service.register(&form).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_clears_session() {
        let mut backend = MockBackendApi::new();
        backend.expect_me().returning(|_| {
            Err(BackendError::Api {
                status: 401,
                message: "Unauthorized".to_string(),
            })
        });
        let (service, sessions, _) = service(backend);
        sessions.set_auth_response(&auth_response()).unwrap();

        assert!(matches!(
            service.refresh_profile().await,
            Err(AuthError::SessionExpired)
        ));
        assert!(!sessions.is_authenticated());
    }

    #[tokio::test]
    async fn test_refresh_profile_updates_user() {
        let mut backend = MockBackendApi::new();
        backend.expect_me().withf(|token| token == "jwt").returning(|_| {
            Ok(UserProfile {
                id: 3,
                username: "grace".to_string(),
                email: "grace@navy.mil".to_string(),
                role: "ADMIN".to_string(),
            })
        });
        let (service, sessions, _) = service(backend);
        sessions.set_auth_response(&auth_response()).unwrap();

        service.refresh_profile().await.unwrap();
        assert_eq!(sessions.current_user().unwrap().role, "ADMIN");
    }

    #[test]
    fn test_logout_when_signed_out_is_quiet() {
        let (service, _, notifier) = service(MockBackendApi::new());
        service.logout().unwrap();
        assert!(notifier.take_pending().is_empty());
    }
}
