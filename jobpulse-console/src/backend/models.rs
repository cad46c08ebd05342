//! Wire models of the JobPulse REST API

use serde::{Deserialize, Serialize};

use crate::auth::UserProfile;

/// Successful sign-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Access token sent as a bearer token on later requests
    pub access_token: String,
    /// Refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (usually `Bearer`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Signed-in user
    pub user: UserProfile,
}

/// Password sign-in request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Body of every code-exchange request
#[derive(Debug, Clone, Serialize)]
pub struct CodeExchangeRequest<'a> {
    /// Authorization code from the provider
    pub code: &'a str,
}

/// Gmail integration status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatus {
    /// Connected Gmail address
    #[serde(default)]
    pub gmail_address: Option<String>,
    /// Whether Gmail is connected
    pub connected: bool,
}

/// Error body returned by the backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    /// HTTP status
    pub status: Option<u16>,
    /// Short error name
    pub error: Option<String>,
    /// Human-readable message
    pub message: Option<String>,
    /// Request path
    pub path: Option<String>,
}

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Waiting for its next run
    Pending,
    /// Executing now
    Running,
    /// Last run succeeded
    Success,
    /// Last run failed
    Failed,
    /// Failed and scheduled for another attempt
    Retrying,
    /// Paused by a user
    Paused,
    /// Out of retries, moved to the dead-letter queue
    Dead,
    /// A status this console does not know yet
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Statuses offered in the job list filter
    pub const FILTERABLE: [Self; 5] = [
        Self::Pending,
        Self::Running,
        Self::Success,
        Self::Retrying,
        Self::Paused,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Retrying => "RETRYING",
            Self::Paused => "PAUSED",
            Self::Dead => "DEAD",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Retrying => "Retrying",
            Self::Paused => "Paused",
            Self::Dead => "Dead",
            Self::Unknown => "Unknown",
        }
    }

    /// Badge CSS class
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Pending => "badge-pending",
            Self::Running => "badge-running",
            Self::Success => "badge-success",
            Self::Failed => "badge-failed",
            Self::Retrying => "badge-retrying",
            Self::Paused => "badge-paused",
            Self::Dead => "badge-dead",
            Self::Unknown => "badge-type",
        }
    }

    /// Whether a job in this status can be paused
    #[must_use]
    pub const fn can_pause(self) -> bool {
        matches!(self, Self::Pending | Self::Running | Self::Retrying)
    }

    /// Whether a job in this status can be resumed
    #[must_use]
    pub const fn can_resume(self) -> bool {
        matches!(self, Self::Paused)
    }
}

/// Kind of work a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    /// Log a message
    Log,
    /// Send an email
    Email,
    /// Call an HTTP endpoint
    HttpCall,
    /// Run a shell command
    Script,
    /// Clean up database records
    DataCleanup,
    /// Generate a report
    ReportGeneration,
}

impl JobType {
    /// Every job type, in the order the create form lists them
    pub const ALL: [Self; 6] = [
        Self::Log,
        Self::Email,
        Self::HttpCall,
        Self::Script,
        Self::DataCleanup,
        Self::ReportGeneration,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Email => "EMAIL",
            Self::HttpCall => "HTTP_CALL",
            Self::Script => "SCRIPT",
            Self::DataCleanup => "DATA_CLEANUP",
            Self::ReportGeneration => "REPORT_GENERATION",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Log => "Log",
            Self::Email => "Email",
            Self::HttpCall => "HTTP",
            Self::Script => "Script",
            Self::DataCleanup => "Data Cleanup",
            Self::ReportGeneration => "Report Generation",
        }
    }

    /// What the executor does with a job of this type
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Log => "Logs a message at the specified level (DEBUG, INFO, WARN, ERROR)",
            Self::Email => "Sends an email via the configured mail server",
            Self::HttpCall => "Makes an HTTP request to an external API",
            Self::Script => "Executes a shell command on the server",
            Self::DataCleanup => "Runs database cleanup: delete old records, truncate, or archive",
            Self::ReportGeneration => {
                "Generates a report: user_activity, job_execution_stats, or system_health"
            }
        }
    }

    /// Starting payload for the create form
    #[must_use]
    pub fn payload_template(self) -> serde_json::Value {
        match self {
            Self::Log => serde_json::json!({"message": "Hello from JobPulse!", "level": "INFO"}),
            Self::Email => serde_json::json!({
                "to": "recipient@example.com",
                "subject": "Email Subject",
                "body": "Email body text",
                "from": "sender@example.com",
                "cc": ""
            }),
            Self::HttpCall => serde_json::json!({
                "url": "https://api.example.com/endpoint",
                "method": "GET",
                "headers": {"Content-Type": "application/json"},
                "body": null,
                "timeoutSeconds": 30
            }),
            Self::Script => {
                serde_json::json!({"command": "echo \"Hello from JobPulse\"", "timeoutSeconds": 300})
            }
            Self::DataCleanup => serde_json::json!({
                "action": "delete_old_records",
                "tableName": "logs",
                "dateColumn": "created_at",
                "daysOld": 30
            }),
            Self::ReportGeneration => {
                serde_json::json!({"reportType": "job_execution_stats", "outputFormat": "CSV"})
            }
        }
    }
}

/// How a new job is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    /// Run once at `runAt`
    #[default]
    OneTime,
    /// Run every `interval` `frequency`
    Recurring,
    /// Run on a cron expression
    Cron,
}

/// Unit of a recurring schedule's interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    /// Seconds
    Seconds,
    /// Minutes
    #[default]
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
}

impl TimeUnit {
    /// Every unit, smallest first
    pub const ALL: [Self; 4] = [Self::Seconds, Self::Minutes, Self::Hours, Self::Days];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }
}

/// A scheduled job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Job ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Job type wire name (e.g. `EMAIL`)
    pub job_type: String,
    /// Executor payload, usually JSON
    #[serde(default)]
    pub payload: Option<String>,
    /// Cron expression of cron-scheduled jobs
    #[serde(default)]
    pub cron_expression: Option<String>,
    /// Whether the job runs more than once
    #[serde(default)]
    pub recurring: bool,
    /// Current status
    pub status: JobStatus,
    /// Retry budget
    #[serde(default)]
    pub max_retries: u32,
    /// Retries used so far
    #[serde(default)]
    pub retry_count: u32,
    /// Next scheduled run (backend local time)
    #[serde(default)]
    pub next_run_time: Option<String>,
    /// Error of the last failed run
    #[serde(default)]
    pub last_error: Option<String>,
}

/// One past run of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRun {
    /// Run ID
    pub id: i64,
    /// When the run started
    #[serde(default)]
    pub run_time: Option<String>,
    /// Outcome wire name
    pub status: String,
    /// Error of a failed run
    #[serde(default)]
    pub error_message: Option<String>,
    /// Which retry this run was
    #[serde(default)]
    pub retry_attempt: u32,
}

/// A job that ran out of retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterJob {
    /// Dead-letter entry ID
    pub id: i64,
    /// Name of the failed job
    pub job_name: String,
    /// Job type wire name
    pub job_type: String,
    /// Final error
    #[serde(default)]
    pub last_error: Option<String>,
    /// When the job was given up on
    #[serde(default)]
    pub failed_at: Option<String>,
    /// Retries used
    #[serde(default)]
    pub retry_count: u32,
    /// Retry budget
    #[serde(default)]
    pub max_retries: u32,
}

/// Job counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobStats {
    /// All jobs
    pub total_jobs: u64,
    /// Pending jobs
    pub pending_jobs: u64,
    /// Running jobs
    pub running_jobs: u64,
    /// Succeeded jobs
    pub successful_jobs: u64,
    /// Retrying jobs
    pub retrying_jobs: u64,
    /// Failed jobs
    pub failed_jobs: u64,
    /// Dead-lettered jobs
    pub dead_letter_jobs: u64,
}

/// Schedule of a new job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Schedule kind
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    /// One-time run, as `yyyy-MM-ddTHH:mm:ss` without a zone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_at: Option<String>,
    /// Unit of a recurring interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<TimeUnit>,
    /// Recurring interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Cron expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
}

/// Body of `POST /jobs/full`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobRequest {
    /// Display name
    pub name: String,
    /// Job type
    pub job_type: JobType,
    /// Executor payload
    pub payload: String,
    /// Schedule
    pub schedule: ScheduleRequest,
    /// Retry budget
    pub max_retries: u32,
}
