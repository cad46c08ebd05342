//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use jobpulse_console::auth::UserProfile;
use jobpulse_console::backend::{
    AuthResponse, BackendApi, BackendError, DeadLetterJob, IntegrationStatus, Job, JobRun,
    JobStats, JobStatus, LoginRequest, NewJobRequest, RegisterRequest,
};
use jobpulse_console::config::ConsoleConfig;
use jobpulse_console::oauth2::{OAuthProvider, ProviderConfig};
use jobpulse_console::state::ConsoleState;
use jobpulse_console::storage::Storage;
use mockall::mock;
use std::sync::Arc;
use url::Url;

mock! {
    pub Backend {}

    #[async_trait]
    impl BackendApi for Backend {
        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, BackendError>;
        async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, BackendError>;
        async fn me(&self, token: &str) -> Result<UserProfile, BackendError>;
        async fn exchange_oauth_code(
            &self,
            provider: OAuthProvider,
            code: &str,
        ) -> Result<AuthResponse, BackendError>;
        async fn connect_gmail(&self, token: &str, code: &str)
            -> Result<IntegrationStatus, BackendError>;
        async fn gmail_status(&self, token: &str) -> Result<IntegrationStatus, BackendError>;
        async fn disconnect_gmail(&self, token: &str) -> Result<(), BackendError>;
        async fn list_jobs(&self, token: &str) -> Result<Vec<Job>, BackendError>;
        async fn get_job(&self, token: &str, id: i64) -> Result<Job, BackendError>;
        async fn create_job(&self, token: &str, request: &NewJobRequest) -> Result<(), BackendError>;
        async fn delete_job(&self, token: &str, id: i64) -> Result<(), BackendError>;
        async fn pause_job(&self, token: &str, id: i64) -> Result<Job, BackendError>;
        async fn resume_job(&self, token: &str, id: i64) -> Result<Job, BackendError>;
        async fn job_history(&self, token: &str, id: i64) -> Result<Vec<JobRun>, BackendError>;
        async fn dead_letter_jobs(&self, token: &str) -> Result<Vec<DeadLetterJob>, BackendError>;
        async fn replay_dead_letter(&self, token: &str, id: i64) -> Result<Job, BackendError>;
        async fn job_stats(&self, token: &str) -> Result<JobStats, BackendError>;
    }
}

/// Dashboard with no jobs yet
pub fn empty_dashboard(backend: &mut MockBackend) {
    backend.expect_job_stats().returning(|_| Ok(JobStats::default()));
    backend.expect_list_jobs().returning(|_| Ok(Vec::new()));
}

pub fn job(id: i64, name: &str, status: JobStatus) -> Job {
    Job {
        id,
        name: name.to_string(),
        job_type: "LOG".to_string(),
        payload: Some(r#"{"message":"hello"}"#.to_string()),
        cron_expression: None,
        recurring: false,
        status,
        max_retries: 3,
        retry_count: 0,
        next_run_time: Some("2026-11-01T09:30:00".to_string()),
        last_error: None,
    }
}

pub fn user(username: &str) -> UserProfile {
    UserProfile {
        id: 1,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: "USER".to_string(),
    }
}

pub fn auth_response(token: &str, username: &str) -> AuthResponse {
    AuthResponse {
        access_token: token.to_string(),
        refresh_token: None,
        token_type: Some("Bearer".to_string()),
        expires_in: Some(3600),
        user: user(username),
    }
}

pub fn api_error(status: u16, message: &str) -> BackendError {
    BackendError::Api {
        status,
        message: message.to_string(),
    }
}

/// Default configuration with Google and GitHub enabled
pub fn config() -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.oauth2.google = Some(ProviderConfig::new("google-client"));
    config.oauth2.github = Some(ProviderConfig::new("github-client"));
    config
}

pub fn state(backend: MockBackend) -> ConsoleState {
    state_with(config(), backend)
}

pub fn state_with(config: ConsoleConfig, backend: MockBackend) -> ConsoleState {
    ConsoleState::with_parts(config, Storage::in_memory(), Arc::new(backend)).unwrap()
}

pub fn sign_in(state: &ConsoleState, token: &str) {
    state
        .sessions()
        .set_auth_response(&auth_response(token, "ada"))
        .unwrap();
}

/// `state` query parameter of an authorization URL
pub fn state_param(url: &Url) -> String {
    url.query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}
