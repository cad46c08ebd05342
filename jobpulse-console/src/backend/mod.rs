//! JobPulse backend client
//!
//! The backend owns everything real: credential checks, provider token
//! exchange, Gmail token storage. The console only forwards requests through
//! [`BackendApi`], which keeps handlers and the OAuth coordinator testable
//! against a fake backend.

pub mod http;
pub mod models;

use async_trait::async_trait;

pub use self::http::HttpBackend;
pub use models::{
    ApiErrorBody, AuthResponse, CodeExchangeRequest, DeadLetterJob, IntegrationStatus, Job,
    JobRun, JobStats, JobStatus, JobType, LoginRequest, NewJobRequest, RegisterRequest,
    ScheduleRequest, ScheduleType, TimeUnit,
};

use crate::auth::UserProfile;
use crate::oauth2::OAuthProvider;

/// Operations the console needs from the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Password sign-in (`POST /auth/login`)
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, BackendError>;

    /// Create an account (`POST /auth/register`)
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, BackendError>;

    /// Current user (`GET /auth/me`)
    async fn me(&self, token: &str) -> Result<UserProfile, BackendError>;

    /// Exchange a provider authorization code for a session (`POST /auth/oauth/{provider}`)
    async fn exchange_oauth_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<AuthResponse, BackendError>;

    /// Exchange a Google code for Gmail tokens on the signed-in account (`POST /gmail/callback`)
    async fn connect_gmail(&self, token: &str, code: &str)
        -> Result<IntegrationStatus, BackendError>;

    /// Gmail integration status (`GET /gmail/status`)
    async fn gmail_status(&self, token: &str) -> Result<IntegrationStatus, BackendError>;

    /// Disconnect Gmail (`DELETE /gmail/disconnect`)
    async fn disconnect_gmail(&self, token: &str) -> Result<(), BackendError>;

    /// Jobs of the signed-in user (`GET /jobs`)
    async fn list_jobs(&self, token: &str) -> Result<Vec<Job>, BackendError>;

    /// One job (`GET /jobs/{id}`)
    async fn get_job(&self, token: &str, id: i64) -> Result<Job, BackendError>;

    /// Create a job with its schedule (`POST /jobs/full`)
    async fn create_job(&self, token: &str, request: &NewJobRequest) -> Result<(), BackendError>;

    /// Delete a job (`DELETE /jobs/{id}`)
    async fn delete_job(&self, token: &str, id: i64) -> Result<(), BackendError>;

    /// Pause a job (`PUT /jobs/{id}/pause`)
    async fn pause_job(&self, token: &str, id: i64) -> Result<Job, BackendError>;

    /// Resume a paused job (`PUT /jobs/{id}/resume`)
    async fn resume_job(&self, token: &str, id: i64) -> Result<Job, BackendError>;

    /// Past runs of a job (`GET /jobs/{id}/history`)
    async fn job_history(&self, token: &str, id: i64) -> Result<Vec<JobRun>, BackendError>;

    /// Dead-letter queue (`GET /jobs/dead-letter`)
    async fn dead_letter_jobs(&self, token: &str) -> Result<Vec<DeadLetterJob>, BackendError>;

    /// Re-queue a dead-lettered job (`POST /jobs/dead-letter/{id}/replay`)
    async fn replay_dead_letter(&self, token: &str, id: i64) -> Result<Job, BackendError>;

    /// Job counts per status (`GET /jobs/stats`)
    async fn job_stats(&self, token: &str) -> Result<JobStats, BackendError>;
}

/// Backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with an error status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the status reason
        message: String,
    },

    /// The request never got an answer
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured API URL is unusable
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Message the backend put in its error body, if it answered at all
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            Self::Transport(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// HTTP status of an error answer
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Whether the backend rejected the access token
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Whether the requested resource does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}
