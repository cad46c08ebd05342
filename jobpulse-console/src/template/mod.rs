//! Askama pages
//!
//! Every page extends `base.html`, which reads the shared [`Layout`]: theme,
//! sidebar state, the signed-in user and the toasts waiting to be shown.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::auth::UserProfile;
use crate::backend::{
    DeadLetterJob, IntegrationStatus, Job, JobRun, JobStats, JobStatus, JobType, ScheduleType,
    TimeUnit,
};
use crate::jobs::{pretty_payload, JobFilter, JobForm};
use crate::notify::Toast;
use crate::oauth2::{FlowKind, OAuthProvider};
use crate::state::ConsoleState;

/// Render askama templates as axum responses
pub trait PageTemplate: Template {
    /// Render as HTML response
    ///
    /// A rendering failure is logged and answered with a plain 500.
    fn render_html(self) -> Response
    where
        Self: Sized,
    {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Template rendering error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
            }
        }
    }
}

impl<T: Template> PageTemplate for T {}

/// Values every page layout needs
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// `data-theme` value
    pub theme: &'static str,
    /// Whether the sidebar is collapsed
    pub sidebar_collapsed: bool,
    /// Signed-in user
    pub user: Option<UserProfile>,
    /// Toasts to show on this page
    pub toasts: Vec<Toast>,
}

impl Layout {
    /// Layout for the current request
    ///
    /// Drains the pending toasts: each toast is shown on exactly one page.
    #[must_use]
    pub fn current(state: &ConsoleState) -> Self {
        let preferences = state.preferences();
        Self {
            theme: preferences.theme().as_str(),
            sidebar_collapsed: preferences.sidebar().is_collapsed(),
            user: state.sessions().current_user(),
            toasts: state.notifier().take_pending(),
        }
    }
}

/// Sign-in and sign-up page
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    /// Shared layout
    pub layout: Layout,
    /// Show the registration form instead of the sign-in form
    pub register: bool,
    /// Form error
    pub error: Option<String>,
    /// Username to pre-fill
    pub username: String,
    /// Email to pre-fill (registration only)
    pub email: String,
    /// Show the Google button
    pub google_enabled: bool,
    /// Show the GitHub button
    pub github_enabled: bool,
}

impl LoginPage {
    /// Empty sign-in (or sign-up) form
    #[must_use]
    pub fn new(state: &ConsoleState, register: bool) -> Self {
        Self {
            layout: Layout::current(state),
            register,
            error: None,
            username: String::new(),
            email: String::new(),
            google_enabled: state.oauth().is_configured(OAuthProvider::Google),
            github_enabled: state.oauth().is_configured(OAuthProvider::GitHub),
        }
    }

    /// Show `error` above the form
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Pre-fill the form
    #[must_use]
    pub fn with_values(mut self, username: &str, email: &str) -> Self {
        self.username = username.to_string();
        self.email = email.to_string();
        self
    }
}

/// Landing page after sign-in
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    /// Shared layout
    pub layout: Layout,
    /// Signed-in user
    pub user: UserProfile,
    /// Job counts; `None` hides the stats grid
    pub stats: Option<JobStats>,
    /// Most recent jobs
    pub recent_jobs: Vec<Job>,
}

/// Job list with filters
#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobListPage {
    /// Shared layout
    pub layout: Layout,
    /// Jobs passing the filter
    pub jobs: Vec<Job>,
    /// Number of jobs before filtering
    pub total: usize,
    /// Active filter
    pub filter: JobFilter,
    /// Status filter options
    pub statuses: &'static [JobStatus],
    /// Type filter options
    pub job_types: &'static [JobType],
}

impl JobListPage {
    /// Apply `filter` to `jobs`
    #[must_use]
    pub fn new(layout: Layout, jobs: Vec<Job>, filter: JobFilter) -> Self {
        let total = jobs.len();
        Self {
            layout,
            jobs: filter.apply(jobs),
            total,
            filter,
            statuses: &JobStatus::FILTERABLE,
            job_types: &JobType::ALL,
        }
    }
}

/// One job with its run history
#[derive(Template)]
#[template(path = "job_detail.html")]
pub struct JobDetailPage {
    /// Shared layout
    pub layout: Layout,
    /// The job
    pub job: Job,
    /// Payload, pretty-printed when it is JSON
    pub payload: String,
    /// Past runs; `None` when they could not be loaded
    pub history: Option<Vec<JobRun>>,
}

impl JobDetailPage {
    /// Detail page for `job`
    #[must_use]
    pub fn new(layout: Layout, job: Job, history: Option<Vec<JobRun>>) -> Self {
        let payload = job.payload.as_deref().map(pretty_payload).unwrap_or_default();
        Self {
            layout,
            job,
            payload,
            history,
        }
    }
}

/// New-job form
#[derive(Template)]
#[template(path = "job_create.html")]
pub struct JobCreatePage {
    /// Shared layout
    pub layout: Layout,
    /// Submitted (or default) values
    pub form: JobForm,
    /// Form error
    pub error: Option<String>,
    /// Job type options
    pub job_types: &'static [JobType],
    /// Interval unit options
    pub time_units: &'static [TimeUnit],
}

impl JobCreatePage {
    /// Form pre-filled with `form`
    #[must_use]
    pub fn new(layout: Layout, form: JobForm) -> Self {
        Self {
            layout,
            form,
            error: None,
            job_types: &JobType::ALL,
            time_units: &TimeUnit::ALL,
        }
    }

    /// Show `error` above the form
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Whether `schedule` is the selected schedule type
    #[must_use]
    pub fn schedule_is(&self, schedule: &str) -> bool {
        let selected = match self.form.schedule_type {
            ScheduleType::OneTime => "ONE_TIME",
            ScheduleType::Recurring => "RECURRING",
            ScheduleType::Cron => "CRON",
        };
        selected == schedule
    }
}

/// Dead-letter queue
#[derive(Template)]
#[template(path = "dead_letter.html")]
pub struct DeadLetterPage {
    /// Shared layout
    pub layout: Layout,
    /// Jobs that ran out of retries
    pub jobs: Vec<DeadLetterJob>,
}

/// Account page with the Gmail integration
#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    /// Shared layout
    pub layout: Layout,
    /// Signed-in user
    pub user: UserProfile,
    /// Gmail is connected
    pub gmail_connected: bool,
    /// Connected Gmail address
    pub gmail_address: Option<String>,
    /// The status could not be loaded
    pub gmail_unavailable: bool,
}

impl ProfilePage {
    /// Profile page; `gmail` is `None` when the status could not be loaded
    #[must_use]
    pub fn new(layout: Layout, user: UserProfile, gmail: Option<IntegrationStatus>) -> Self {
        let gmail_unavailable = gmail.is_none();
        let status = gmail.unwrap_or_default();
        Self {
            layout,
            user,
            gmail_connected: status.connected,
            gmail_address: status.gmail_address,
            gmail_unavailable,
        }
    }
}

/// Failed OAuth callback
#[derive(Template)]
#[template(path = "callback.html")]
pub struct CallbackErrorPage {
    /// Shared layout
    pub layout: Layout,
    /// Provider display name
    pub provider_name: &'static str,
    /// What went wrong
    pub message: String,
    /// Where the user can go from here
    pub recovery_route: &'static str,
    /// Label of the recovery link
    pub recovery_label: &'static str,
}

impl CallbackErrorPage {
    /// Error page for a failed attempt
    #[must_use]
    pub fn new(layout: Layout, provider: OAuthProvider, flow: FlowKind, message: String) -> Self {
        Self {
            layout,
            provider_name: provider.display_name(),
            message,
            recovery_route: flow.recovery_route(),
            recovery_label: flow.recovery_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastLevel;

    fn user() -> UserProfile {
        UserProfile {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "USER".to_string(),
        }
    }

    fn layout() -> Layout {
        Layout {
            theme: "dark",
            sidebar_collapsed: false,
            user: Some(user()),
            toasts: vec![Toast::new(ToastLevel::Success, "Signed in with Google!")],
        }
    }

    #[test]
    fn test_callback_page_shows_recovery_link() {
        let page = CallbackErrorPage::new(
            Layout::default(),
            OAuthProvider::Google,
            FlowKind::LinkSecondaryAccount,
            "invalid_grant".to_string(),
        );
        let html = page.render().unwrap();

        assert!(html.contains("invalid_grant"));
        assert!(html.contains(r#"href="/profile""#));
        assert!(html.contains("Back to Profile"));
    }

    #[test]
    fn test_layout_renders_toasts_and_theme() {
        let html = DashboardPage {
            layout: layout(),
            user: user(),
            stats: None,
            recent_jobs: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"data-theme="dark""#));
        assert!(html.contains("Signed in with Google!"));
        assert!(html.contains(r#"data-duration-ms="3000""#));
    }

    fn job(status: JobStatus) -> Job {
        Job {
            id: 42,
            name: "Nightly report".to_string(),
            job_type: "REPORT_GENERATION".to_string(),
            payload: Some(r#"{"reportType":"system_health"}"#.to_string()),
            cron_expression: None,
            recurring: true,
            status,
            max_retries: 3,
            retry_count: 1,
            next_run_time: Some("2026-11-01T09:30:00".to_string()),
            last_error: None,
        }
    }

    #[test]
    fn test_dashboard_stats_and_recent_jobs() {
        let stats = JobStats {
            total_jobs: 12,
            dead_letter_jobs: 2,
            ..JobStats::default()
        };
        let html = DashboardPage {
            layout: layout(),
            user: user(),
            stats: Some(stats),
            recent_jobs: vec![job(JobStatus::Pending)],
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"<span class="stat-value">12</span>"#));
        assert!(html.contains("Nightly report"));
        assert!(html.contains(r#"href="/jobs/42""#));
    }

    #[test]
    fn test_job_actions_follow_status() {
        let pending = JobListPage::new(layout(), vec![job(JobStatus::Pending)], JobFilter::default())
            .render()
            .unwrap();
        assert!(pending.contains(r#"action="/jobs/42/pause""#));
        assert!(!pending.contains(r#"action="/jobs/42/resume""#));

        let paused = JobListPage::new(layout(), vec![job(JobStatus::Paused)], JobFilter::default())
            .render()
            .unwrap();
        assert!(paused.contains(r#"action="/jobs/42/resume""#));
        assert!(paused.contains("badge-paused"));
    }

    #[test]
    fn test_filtered_out_list_says_so() {
        let filter = JobFilter {
            q: "nothing".to_string(),
            ..JobFilter::default()
        };
        let html = JobListPage::new(layout(), vec![job(JobStatus::Pending)], filter)
            .render()
            .unwrap();
        assert!(html.contains("No jobs match your filters."));
        assert!(html.contains(r#"value="nothing""#));
    }

    #[test]
    fn test_job_detail_pretty_prints_payload() {
        let html = JobDetailPage::new(layout(), job(JobStatus::Success), None)
            .render()
            .unwrap();
        assert!(html.contains("&quot;reportType&quot;: &quot;system_health&quot;"));
        assert!(html.contains("History is unavailable"));
    }

    #[test]
    fn test_create_form_keeps_selected_schedule() {
        let form = JobForm {
            schedule_type: ScheduleType::Cron,
            cron_expression: "0 0 * * *".to_string(),
            ..JobForm::default()
        };
        let html = JobCreatePage::new(layout(), form)
            .with_error("Please provide a job name.")
            .render()
            .unwrap();
        assert!(html.contains(r#"<option value="CRON" selected>"#));
        assert!(html.contains("Please provide a job name."));
    }

    #[test]
    fn test_profile_connected_state() {
        let status = IntegrationStatus {
            gmail_address: Some("ada@gmail.com".to_string()),
            connected: true,
        };
        let html = ProfilePage::new(layout(), user(), Some(status))
            .render()
            .unwrap();

        assert!(html.contains("ada@gmail.com"));
        assert!(html.contains("/profile/gmail/disconnect"));
        assert!(!html.contains("/profile/gmail/connect\""));
    }

    #[test]
    fn test_profile_status_unavailable() {
        let html = ProfilePage::new(layout(), user(), None).render().unwrap();
        assert!(html.contains("unavailable"));
    }

    #[test]
    fn test_messages_are_escaped() {
        let page = CallbackErrorPage::new(
            Layout::default(),
            OAuthProvider::GitHub,
            FlowKind::Login,
            "<script>alert(1)</script>".to_string(),
        );
        let html = page.render().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
