//! HTTP implementation of [`BackendApi`]

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    ApiErrorBody, AuthResponse, BackendApi, BackendError, CodeExchangeRequest, DeadLetterJob,
    IntegrationStatus, Job, JobRun, JobStats, LoginRequest, NewJobRequest, RegisterRequest,
};
use crate::auth::UserProfile;
use crate::config::BackendSettings;
use crate::oauth2::OAuthProvider;

/// Backend client speaking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the configured API URL
    ///
    /// Redirects are not followed; the backend never answers API calls with one.
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let base = Url::parse(&settings.api_url)?;
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are made against, without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .message
            .filter(|m| !m.trim().is_empty())
            .or(body.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        tracing::debug!(status = status.as_u16(), %message, "Backend returned an error");
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        Ok(self.send(builder).await?.json().await?)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, BackendError> {
        self.json(self.request(Method::POST, "/auth/login", None).json(request))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, BackendError> {
        self.json(self.request(Method::POST, "/auth/register", None).json(request))
            .await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, BackendError> {
        self.json(self.request(Method::GET, "/auth/me", Some(token)))
            .await
    }

    async fn exchange_oauth_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<AuthResponse, BackendError> {
        let path = format!("/auth/oauth/{}", provider.as_str());
        self.json(
            self.request(Method::POST, &path, None)
                .json(&CodeExchangeRequest { code }),
        )
        .await
    }

    async fn connect_gmail(
        &self,
        token: &str,
        code: &str,
    ) -> Result<IntegrationStatus, BackendError> {
        self.json(
            self.request(Method::POST, "/gmail/callback", Some(token))
                .json(&CodeExchangeRequest { code }),
        )
        .await
    }

    async fn gmail_status(&self, token: &str) -> Result<IntegrationStatus, BackendError> {
        self.json(self.request(Method::GET, "/gmail/status", Some(token)))
            .await
    }

    async fn disconnect_gmail(&self, token: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::DELETE, "/gmail/disconnect", Some(token)))
            .await?;
        Ok(())
    }

    async fn list_jobs(&self, token: &str) -> Result<Vec<Job>, BackendError> {
        self.json(self.request(Method::GET, "/jobs", Some(token)))
            .await
    }

    async fn get_job(&self, token: &str, id: i64) -> Result<Job, BackendError> {
        self.json(self.request(Method::GET, &format!("/jobs/{id}"), Some(token)))
            .await
    }

    async fn create_job(&self, token: &str, request: &NewJobRequest) -> Result<(), BackendError> {
        self.send(self.request(Method::POST, "/jobs/full", Some(token)).json(request))
            .await?;
        Ok(())
    }

    async fn delete_job(&self, token: &str, id: i64) -> Result<(), BackendError> {
        self.send(self.request(Method::DELETE, &format!("/jobs/{id}"), Some(token)))
            .await?;
        Ok(())
    }

    async fn pause_job(&self, token: &str, id: i64) -> Result<Job, BackendError> {
        self.json(
            self.request(Method::PUT, &format!("/jobs/{id}/pause"), Some(token))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn resume_job(&self, token: &str, id: i64) -> Result<Job, BackendError> {
        self.json(
            self.request(Method::PUT, &format!("/jobs/{id}/resume"), Some(token))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn job_history(&self, token: &str, id: i64) -> Result<Vec<JobRun>, BackendError> {
        self.json(self.request(Method::GET, &format!("/jobs/{id}/history"), Some(token)))
            .await
    }

    async fn dead_letter_jobs(&self, token: &str) -> Result<Vec<DeadLetterJob>, BackendError> {
        self.json(self.request(Method::GET, "/jobs/dead-letter", Some(token)))
            .await
    }

    async fn replay_dead_letter(&self, token: &str, id: i64) -> Result<Job, BackendError> {
        let path = format!("/jobs/dead-letter/{id}/replay");
        self.json(
            self.request(Method::POST, &path, Some(token))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn job_stats(&self, token: &str) -> Result<JobStats, BackendError> {
        self.json(self.request(Method::GET, "/jobs/stats", Some(token)))
            .await
    }
}
