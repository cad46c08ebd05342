//! Background jobs and the dead-letter queue
//!
//! [`JobService`] forwards job management to the backend with the signed-in
//! user's token. Actions (pause, resume, delete, replay, create) report their
//! outcome as toasts; loads leave that to the page. A token the backend no
//! longer accepts ends the session, exactly like a failed profile refresh.

use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::{first_validation_message, SessionError, SessionStore};
use crate::backend::{
    BackendApi, BackendError, DeadLetterJob, Job, JobRun, JobStats, JobType, NewJobRequest,
    ScheduleRequest, ScheduleType, TimeUnit,
};
use crate::notify::Notifier;

/// Number of jobs the dashboard lists
pub const RECENT_JOBS: usize = 10;

/// Retry budget of a new job when the form leaves it empty
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Largest retry budget the form accepts
const MAX_RETRIES_LIMIT: u32 = 10;

/// Job list filter, read from the `/jobs` query string
///
/// Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobFilter {
    /// Case-insensitive search over name and type
    pub q: String,
    /// Exact status wire name
    pub status: String,
    /// Exact job type wire name
    #[serde(rename = "type")]
    pub job_type: String,
}

impl JobFilter {
    /// Whether any field narrows the list
    #[must_use]
    pub fn is_active(&self) -> bool {
        !(self.q.trim().is_empty() && self.status.is_empty() && self.job_type.is_empty())
    }

    /// Whether `job` passes the filter
    #[must_use]
    pub fn matches(&self, job: &Job) -> bool {
        let term = self.q.trim().to_lowercase();
        let search = term.is_empty()
            || job.name.to_lowercase().contains(&term)
            || job.job_type.to_lowercase().contains(&term);
        let status = self.status.is_empty() || job.status.as_str() == self.status;
        let job_type = self.job_type.is_empty() || job.job_type == self.job_type;

        search && status && job_type
    }

    /// Keep the jobs that pass the filter
    #[must_use]
    pub fn apply(&self, jobs: Vec<Job>) -> Vec<Job> {
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}

/// New-job form data
///
/// Numeric fields arrive as text so that fields hidden for the chosen
/// schedule type can be submitted empty.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobForm {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Please provide a job name."))]
    pub name: String,

    /// Job type
    pub job_type: JobType,

    /// Executor payload (JSON)
    #[serde(default)]
    pub payload: String,

    /// Retry budget
    #[serde(default)]
    pub max_retries: String,

    /// Schedule kind
    #[serde(default)]
    pub schedule_type: ScheduleType,

    /// One-time run, as `yyyy-MM-ddTHH:mm` from a `datetime-local` input
    #[serde(default)]
    pub execute_at: String,

    /// Recurring interval
    #[serde(default)]
    pub interval: String,

    /// Recurring interval unit
    #[serde(default)]
    pub frequency: TimeUnit,

    /// Cron expression
    #[serde(default)]
    pub cron_expression: String,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            job_type: JobType::Log,
            payload: pretty_payload(&JobType::Log.payload_template().to_string()),
            max_retries: DEFAULT_MAX_RETRIES.to_string(),
            schedule_type: ScheduleType::OneTime,
            execute_at: String::new(),
            interval: "1".to_string(),
            frequency: TimeUnit::Minutes,
            cron_expression: String::new(),
        }
    }
}

impl JobForm {
    /// Check the form and build the request body
    pub fn to_request(&self) -> Result<NewJobRequest, JobError> {
        self.validate()
            .map_err(|e| JobError::Invalid(first_validation_message(&e)))?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(JobError::invalid("Please provide a job name."));
        }

        let payload = match self.payload.trim() {
            "" => "{}".to_string(),
            raw if serde_json::from_str::<serde_json::Value>(raw).is_ok() => raw.to_string(),
            _ => return Err(JobError::invalid("Payload must be valid JSON.")),
        };

        let max_retries = match self.max_retries.trim() {
            "" => DEFAULT_MAX_RETRIES,
            raw => raw
                .parse()
                .ok()
                .filter(|n| *n <= MAX_RETRIES_LIMIT)
                .ok_or_else(|| JobError::invalid("Max retries must be between 0 and 10."))?,
        };

        Ok(NewJobRequest {
            name: name.to_string(),
            job_type: self.job_type,
            payload,
            schedule: self.schedule()?,
            max_retries,
        })
    }

    fn schedule(&self) -> Result<ScheduleRequest, JobError> {
        let mut schedule = ScheduleRequest {
            schedule_type: self.schedule_type,
            run_at: None,
            frequency: None,
            interval: None,
            cron_expression: None,
        };

        match self.schedule_type {
            ScheduleType::OneTime => {
                let at = self.execute_at.trim();
                if at.is_empty() {
                    return Err(JobError::invalid("Please specify when to execute the job."));
                }
                // datetime-local omits seconds
                schedule.run_at = Some(if at.len() == 16 {
                    format!("{at}:00")
                } else {
                    at.to_string()
                });
            }
            ScheduleType::Recurring => {
                let interval = self
                    .interval
                    .trim()
                    .parse()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| JobError::invalid("Interval must be a positive number."))?;
                schedule.interval = Some(interval);
                schedule.frequency = Some(self.frequency);
            }
            ScheduleType::Cron => {
                let expression = self.cron_expression.trim();
                if expression.is_empty() {
                    return Err(JobError::invalid("Please provide a cron expression."));
                }
                schedule.cron_expression = Some(expression.to_string());
            }
        }

        Ok(schedule)
    }
}

/// Pretty-print a JSON payload, or return it unchanged if it is not JSON
#[must_use]
pub fn pretty_payload(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Job management for the signed-in user
#[derive(Clone)]
pub struct JobService {
    backend: Arc<dyn BackendApi>,
    sessions: SessionStore,
    notifier: Notifier,
}

impl JobService {
    /// Create the service
    #[must_use]
    pub fn new(backend: Arc<dyn BackendApi>, sessions: SessionStore, notifier: Notifier) -> Self {
        Self {
            backend,
            sessions,
            notifier,
        }
    }

    /// Every job of the signed-in user
    pub async fn list(&self) -> Result<Vec<Job>, JobError> {
        let token = self.sessions.require_token()?;
        self.backend
            .list_jobs(&token)
            .await
            .map_err(|e| self.backend_error(e))
    }

    /// One job
    pub async fn get(&self, id: i64) -> Result<Job, JobError> {
        let token = self.sessions.require_token()?;
        self.backend
            .get_job(&token, id)
            .await
            .map_err(|e| self.backend_error(e))
    }

    /// Past runs of a job
    pub async fn history(&self, id: i64) -> Result<Vec<JobRun>, JobError> {
        let token = self.sessions.require_token()?;
        self.backend
            .job_history(&token, id)
            .await
            .map_err(|e| self.backend_error(e))
    }

    /// Job counts per status
    pub async fn stats(&self) -> Result<JobStats, JobError> {
        let token = self.sessions.require_token()?;
        self.backend
            .job_stats(&token)
            .await
            .map_err(|e| self.backend_error(e))
    }

    /// The dead-letter queue
    pub async fn dead_letters(&self) -> Result<Vec<DeadLetterJob>, JobError> {
        let token = self.sessions.require_token()?;
        self.backend
            .dead_letter_jobs(&token)
            .await
            .map_err(|e| self.backend_error(e))
    }

    /// Create a job from the form
    ///
    /// Form problems and backend refusals come back as
    /// [`JobError::Invalid`] and [`JobError::Rejected`] for the form to show.
    pub async fn create(&self, form: &JobForm) -> Result<(), JobError> {
        let token = self.sessions.require_token()?;
        let request = form.to_request()?;

        match self.backend.create_job(&token, &request).await {
            Ok(()) => {
                tracing::info!(name = %request.name, job_type = request.job_type.as_str(), "Job created");
                self.notifier.success("Job created successfully!");
                Ok(())
            }
            Err(e) if e.is_unauthorized() => Err(self.backend_error(e)),
            Err(e) => {
                tracing::warn!(error = %e, "Job creation rejected");
                Err(JobError::Rejected(
                    e.api_message()
                        .filter(|m| !m.is_empty())
                        .unwrap_or("Failed to create job.")
                        .to_string(),
                ))
            }
        }
    }

    /// Pause a job
    pub async fn pause(&self, id: i64) -> Result<Job, JobError> {
        let token = self.sessions.require_token()?;
        let result = self.backend.pause_job(&token, id).await;
        self.report(result, "Failed to pause job.", |job| {
            format!("Job \"{}\" paused.", job.name)
        })
    }

    /// Resume a paused job
    pub async fn resume(&self, id: i64) -> Result<Job, JobError> {
        let token = self.sessions.require_token()?;
        let result = self.backend.resume_job(&token, id).await;
        self.report(result, "Failed to resume job.", |job| {
            format!("Job \"{}\" resumed.", job.name)
        })
    }

    /// Delete a job
    pub async fn delete(&self, id: i64) -> Result<(), JobError> {
        let token = self.sessions.require_token()?;
        let result = self.backend.delete_job(&token, id).await;
        self.report(result, "Failed to delete job.", |_| "Job deleted.".to_string())
    }

    /// Put a dead-lettered job back on the schedule
    pub async fn replay(&self, id: i64) -> Result<Job, JobError> {
        let token = self.sessions.require_token()?;
        let result = self.backend.replay_dead_letter(&token, id).await;
        self.report(result, "Failed to replay job.", |_| {
            "Job replayed successfully!".to_string()
        })
    }

    fn report<T>(
        &self,
        result: Result<T, BackendError>,
        failure: &str,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, JobError> {
        match result {
            Ok(value) => {
                let message = success(&value);
                tracing::info!(%message, "Job action succeeded");
                self.notifier.success(message);
                Ok(value)
            }
            Err(e) if e.is_unauthorized() => Err(self.backend_error(e)),
            Err(e) => {
                tracing::warn!(error = %e, "{failure}");
                self.notifier.error(failure);
                Err(e.into())
            }
        }
    }

    /// Map a backend error, ending the session on a rejected token
    fn backend_error(&self, error: BackendError) -> JobError {
        if !error.is_unauthorized() {
            return error.into();
        }

        tracing::info!("Backend rejected the session token, signing out");
        if let Err(e) = self.sessions.clear() {
            tracing::error!(error = %e, "Could not clear expired session");
        }
        let expired = JobError::SessionExpired;
        self.notifier.warning(expired.to_string());
        expired
    }
}

impl std::fmt::Debug for JobService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobService").finish_non_exhaustive()
    }
}

/// Job management errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// The new-job form is incomplete or malformed
    #[error("{0}")]
    Invalid(String),

    /// The backend refused to create the job
    #[error("{0}")]
    Rejected(String),

    /// The backend no longer accepts the session token
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,

    /// No user is signed in
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl JobError {
    fn invalid(message: &str) -> Self {
        Self::Invalid(message.to_string())
    }

    /// Whether the error is the user's to fix (shown on the form)
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Rejected(_))
    }

    /// Whether the user has to sign in again
    #[must_use]
    pub const fn is_signed_out(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::Session(SessionError::NotAuthenticated)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AuthResponse, JobStatus, MockBackendApi};
    use crate::storage::Storage;
    use mockall::predicate::eq;

    struct Fixture {
        jobs: JobService,
        sessions: SessionStore,
        notifier: Notifier,
    }

    fn fixture(backend: MockBackendApi) -> Fixture {
        let sessions = SessionStore::load(Storage::in_memory()).unwrap();
        let response: AuthResponse = serde_json::from_value(serde_json::json!({
            "accessToken": "jwt",
            "user": {"id": 1, "username": "ada", "email": "ada@example.com", "role": "USER"}
        }))
        .unwrap();
        sessions.set_auth_response(&response).unwrap();
        let notifier = Notifier::new();

        Fixture {
            jobs: JobService::new(Arc::new(backend), sessions.clone(), notifier.clone()),
            sessions,
            notifier,
        }
    }

    fn job(id: i64, name: &str, job_type: &str, status: JobStatus) -> Job {
        Job {
            id,
            name: name.to_string(),
            job_type: job_type.to_string(),
            payload: None,
            cron_expression: None,
            recurring: false,
            status,
            max_retries: 3,
            retry_count: 0,
            next_run_time: None,
            last_error: None,
        }
    }

    fn form() -> JobForm {
        JobForm {
            name: "Nightly report".to_string(),
            execute_at: "2026-11-01T09:30".to_string(),
            ..JobForm::default()
        }
    }

    #[test]
    fn test_filter_searches_name_and_type() {
        let jobs = vec![
            job(1, "Nightly report", "REPORT_GENERATION", JobStatus::Pending),
            job(2, "Ping", "HTTP_CALL", JobStatus::Paused),
            job(3, "Welcome mail", "EMAIL", JobStatus::Success),
        ];

        let by_name = JobFilter {
            q: "  NIGHTLY ".to_string(),
            ..JobFilter::default()
        };
        assert_eq!(by_name.apply(jobs.clone()).len(), 1);

        let by_type_text = JobFilter {
            q: "http".to_string(),
            ..JobFilter::default()
        };
        assert_eq!(by_type_text.apply(jobs.clone())[0].id, 2);

        let by_status_and_type = JobFilter {
            status: "SUCCESS".to_string(),
            job_type: "EMAIL".to_string(),
            ..JobFilter::default()
        };
        assert_eq!(by_status_and_type.apply(jobs.clone())[0].id, 3);

        assert!(!JobFilter::default().is_active());
        assert_eq!(JobFilter::default().apply(jobs).len(), 3);
    }

    #[test]
    fn test_one_time_schedule_gets_seconds() {
        let request = form().to_request().unwrap();
        assert_eq!(request.schedule.schedule_type, ScheduleType::OneTime);
        assert_eq!(request.schedule.run_at.as_deref(), Some("2026-11-01T09:30:00"));
        assert_eq!(request.max_retries, 3);
        assert!(request.payload.contains("Hello from JobPulse!"));
    }

    #[test]
    fn test_recurring_schedule() {
        let form = JobForm {
            schedule_type: ScheduleType::Recurring,
            interval: "15".to_string(),
            frequency: TimeUnit::Seconds,
            execute_at: String::new(),
            ..form()
        };
        let schedule = form.to_request().unwrap().schedule;
        assert_eq!(schedule.interval, Some(15));
        assert_eq!(schedule.frequency, Some(TimeUnit::Seconds));
        assert!(schedule.run_at.is_none());
    }

    #[test]
    fn test_form_errors() {
        let cases = [
            (
                JobForm {
                    name: "   ".to_string(),
                    ..form()
                },
                "Please provide a job name.",
            ),
            (
                JobForm {
                    execute_at: String::new(),
                    ..form()
                },
                "Please specify when to execute the job.",
            ),
            (
                JobForm {
                    schedule_type: ScheduleType::Cron,
                    ..form()
                },
                "Please provide a cron expression.",
            ),
            (
                JobForm {
                    schedule_type: ScheduleType::Recurring,
                    interval: "0".to_string(),
                    ..form()
                },
                "Interval must be a positive number.",
            ),
            (
                JobForm {
                    payload: "{not json".to_string(),
                    ..form()
                },
                "Payload must be valid JSON.",
            ),
            (
                JobForm {
                    max_retries: "11".to_string(),
                    ..form()
                },
                "Max retries must be between 0 and 10.",
            ),
        ];

        for (form, message) in cases {
            let err = form.to_request().unwrap_err();
            assert!(err.is_user_facing());
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_pretty_payload() {
        assert_eq!(pretty_payload(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(pretty_payload("plain text"), "plain text");
    }

    #[tokio::test]
    async fn test_pause_announces_job_name() {
        let mut backend = MockBackendApi::new();
        backend
            .expect_pause_job()
            .with(eq("jwt"), eq(7))
            .times(1)
            .returning(|_, id| Ok(job(id, "Ping", "HTTP_CALL", JobStatus::Paused)));
        let fx = fixture(backend);

        let paused = fx.jobs.pause(7).await.unwrap();
        assert_eq!(paused.status, JobStatus::Paused);
        assert_eq!(fx.notifier.take_pending()[0].message, "Job \"Ping\" paused.");
    }

    #[tokio::test]
    async fn test_failed_action_notifies() {
        let mut backend = MockBackendApi::new();
        backend.expect_replay_dead_letter().returning(|_, _| {
            Err(BackendError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        });
        let fx = fixture(backend);

        assert!(matches!(fx.jobs.replay(4).await, Err(JobError::Backend(_))));
        assert_eq!(fx.notifier.take_pending()[0].message, "Failed to replay job.");
        assert!(fx.sessions.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_token_ends_session() {
        let mut backend = MockBackendApi::new();
        backend.expect_list_jobs().returning(|_| {
            Err(BackendError::Api {
                status: 401,
                message: "Unauthorized".to_string(),
            })
        });
        let fx = fixture(backend);

        let err = fx.jobs.list().await.unwrap_err();
        assert!(err.is_signed_out());
        assert!(!fx.sessions.is_authenticated());
        assert_eq!(
            fx.notifier.take_pending()[0].message,
            "Your session has expired. Please sign in again."
        );
    }

    #[tokio::test]
    async fn test_create_surfaces_backend_message() {
        let mut backend = MockBackendApi::new();
        backend.expect_create_job().returning(|_, _| {
            Err(BackendError::Api {
                status: 400,
                message: "Invalid cron expression".to_string(),
            })
        });
        let fx = fixture(backend);

        let err = fx.jobs.create(&form()).await.unwrap_err();
        assert!(matches!(err, JobError::Rejected(ref m) if m == "Invalid cron expression"));
        assert!(fx.notifier.take_pending().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let mut backend = MockBackendApi::new();
        backend.expect_create_job().never();
        let fx = fixture(backend);

        let form = JobForm {
            execute_at: String::new(),
            ..form()
        };
        assert!(matches!(fx.jobs.create(&form).await, Err(JobError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_signed_out_calls_fail_early() {
        let mut backend = MockBackendApi::new();
        backend.expect_job_stats().never();
        let fx = fixture(backend);
        fx.sessions.clear().unwrap();

        let err = fx.jobs.stats().await.unwrap_err();
        assert!(err.is_signed_out());
    }
}
