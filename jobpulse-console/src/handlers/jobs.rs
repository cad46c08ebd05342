//! Job list, job detail, new-job form and dead-letter handlers
//!
//! All routes here sit behind [`crate::middleware::require_session`]. Loads
//! that fail render an empty page with an error toast; a token the backend
//! rejects sends the user back to the login page.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::back_to;
use crate::error::ConsoleError;
use crate::jobs::{JobError, JobFilter, JobForm};
use crate::state::ConsoleState;
use crate::template::{
    DeadLetterPage, JobCreatePage, JobDetailPage, JobListPage, Layout, PageTemplate,
};

/// Job list
const JOBS_PATH: &str = "/jobs";

/// Dead-letter queue
const DEAD_LETTER_PATH: &str = "/dead-letter";

/// GET /jobs
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn job_list(
    State(state): State<ConsoleState>,
    Query(filter): Query<JobFilter>,
) -> Result<Response, ConsoleError> {
    let jobs = match state.jobs().list().await {
        Ok(jobs) => jobs,
        Err(e) => {
            page_load_failed(&state, e, "Failed to load jobs.")?;
            Vec::new()
        }
    };

    Ok(JobListPage::new(Layout::current(&state), jobs, filter).render_html())
}

/// GET /jobs/create
#[allow(clippy::unused_async)]
pub async fn create_page(State(state): State<ConsoleState>) -> Response {
    JobCreatePage::new(Layout::current(&state), JobForm::default()).render_html()
}

/// POST /jobs/create
///
/// A form the backend cannot accept is shown again with its error.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the backend is unreachable
pub async fn create_post(
    State(state): State<ConsoleState>,
    Form(form): Form<JobForm>,
) -> Result<Response, ConsoleError> {
    match state.jobs().create(&form).await {
        Ok(()) => Ok(Redirect::to(JOBS_PATH).into_response()),
        Err(e) if e.is_user_facing() => Ok(JobCreatePage::new(Layout::current(&state), form)
            .with_error(e.to_string())
            .render_html()),
        Err(e) => Err(e.into()),
    }
}

/// GET /jobs/{id}
///
/// An unknown job sends the user back to the list. The page still renders
/// when the run history cannot be loaded.
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn job_detail(
    State(state): State<ConsoleState>,
    Path(id): Path<i64>,
) -> Result<Response, ConsoleError> {
    let job = match state.jobs().get(id).await {
        Ok(job) => job,
        Err(JobError::Backend(e)) if e.is_not_found() => {
            state.notifier().error("Job not found.");
            return Ok(Redirect::to(JOBS_PATH).into_response());
        }
        Err(e) => {
            page_load_failed(&state, e, "Failed to load job.")?;
            return Ok(Redirect::to(JOBS_PATH).into_response());
        }
    };

    let history = match state.jobs().history(id).await {
        Ok(runs) => Some(runs),
        Err(e) if e.is_signed_out() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(job_id = id, error = %e, "Could not load job history");
            None
        }
    };

    Ok(JobDetailPage::new(Layout::current(&state), job, history).render_html())
}

/// POST /jobs/{id}/pause
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn pause(
    State(state): State<ConsoleState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Redirect, ConsoleError> {
    signed_in(state.jobs().pause(id).await)?;
    Ok(Redirect::to(&back_to(&state, &headers, JOBS_PATH)))
}

/// POST /jobs/{id}/resume
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn resume(
    State(state): State<ConsoleState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Redirect, ConsoleError> {
    signed_in(state.jobs().resume(id).await)?;
    Ok(Redirect::to(&back_to(&state, &headers, JOBS_PATH)))
}

/// POST /jobs/{id}/delete
///
/// Always lands on the list, since the detail page is gone.
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn delete(
    State(state): State<ConsoleState>,
    Path(id): Path<i64>,
) -> Result<Redirect, ConsoleError> {
    signed_in(state.jobs().delete(id).await)?;
    Ok(Redirect::to(JOBS_PATH))
}

/// GET /dead-letter
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn dead_letter(State(state): State<ConsoleState>) -> Result<Response, ConsoleError> {
    let jobs = match state.jobs().dead_letters().await {
        Ok(jobs) => jobs,
        Err(e) => {
            page_load_failed(&state, e, "Failed to load dead letter jobs.")?;
            Vec::new()
        }
    };

    Ok(DeadLetterPage {
        layout: Layout::current(&state),
        jobs,
    }
    .render_html())
}

/// POST /dead-letter/{id}/replay
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn replay(
    State(state): State<ConsoleState>,
    Path(id): Path<i64>,
) -> Result<Redirect, ConsoleError> {
    signed_in(state.jobs().replay(id).await)?;
    Ok(Redirect::to(DEAD_LETTER_PATH))
}

/// Keep going after a failed action unless the session ended
///
/// The action already reported its failure as a toast.
fn signed_in<T>(result: Result<T, JobError>) -> Result<(), ConsoleError> {
    match result {
        Err(e) if e.is_signed_out() => Err(e.into()),
        _ => Ok(()),
    }
}

/// Report a failed page load as a toast unless the session ended
fn page_load_failed(state: &ConsoleState, error: JobError, message: &str) -> Result<(), ConsoleError> {
    if error.is_signed_out() {
        return Err(error.into());
    }
    tracing::warn!(error = %error, "{message}");
    state.notifier().error(message);
    Ok(())
}
