//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::auth::{AuthError, SessionError};
use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::integrations::IntegrationError;
use crate::jobs::JobError;
use crate::oauth2::OAuthError;
use crate::storage::StorageError;

/// Console error type
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// OAuth2 error
    #[error("OAuth2 error: {0}")]
    OAuth(#[from] OAuthError),

    /// Backend error
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Gmail integration error
    #[error("Gmail integration error: {0}")]
    Integration(#[from] IntegrationError),

    /// Job management error
    #[error("Job error: {0}")]
    Jobs(#[from] JobError),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not Found (404)
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ConsoleError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::OAuth(OAuthError::UnsupportedFlow { .. })
            | Self::Auth(AuthError::Validation(_))
            | Self::Jobs(JobError::Invalid(_) | JobError::Rejected(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound(_)
            | Self::OAuth(OAuthError::UnknownProvider(_) | OAuthError::ProviderNotConfigured(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Session(SessionError::NotAuthenticated)
            | Self::Auth(AuthError::SessionExpired | AuthError::Session(SessionError::NotAuthenticated))
            | Self::Integration(IntegrationError::Session(SessionError::NotAuthenticated))
            | Self::Jobs(JobError::SessionExpired | JobError::Session(SessionError::NotAuthenticated)) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Backend(_)
            | Self::Jobs(JobError::Backend(_))
            | Self::Integration(IntegrationError::Backend(_))
            | Self::Auth(AuthError::Backend(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::UNAUTHORIZED {
            return Redirect::to("/login").into_response();
        }

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth2::OAuthProvider;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ConsoleError::OAuth(OAuthError::UnknownProvider("x".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ConsoleError::OAuth(OAuthError::ProviderNotConfigured(OAuthProvider::GitHub))
                .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ConsoleError::Backend(BackendError::Api {
                status: 500,
                message: "boom".into()
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ConsoleError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_job_errors() {
        assert_eq!(
            ConsoleError::Jobs(JobError::SessionExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ConsoleError::Jobs(JobError::Invalid("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ConsoleError::Jobs(JobError::Backend(BackendError::Api {
                status: 503,
                message: "down".into()
            }))
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_not_authenticated_redirects_to_login() {
        let response = ConsoleError::Session(SessionError::NotAuthenticated).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }
}
