//! Dashboard, profile and Gmail integration handlers
//!
//! All routes here sit behind [`crate::middleware::require_session`].

use axum::{
    extract::State,
    response::{Redirect, Response},
};

use crate::auth::{AuthError, SessionError, UserProfile};
use crate::error::ConsoleError;
use crate::integrations::IntegrationError;
use crate::jobs::RECENT_JOBS;
use crate::state::ConsoleState;
use crate::template::{DashboardPage, Layout, PageTemplate, ProfilePage};

/// Where the Gmail actions return to
const PROFILE_PATH: &str = "/profile";

/// GET /dashboard
///
/// Stats and recent jobs are optional: the page renders without them when
/// the backend cannot provide them.
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn dashboard(State(state): State<ConsoleState>) -> Result<Response, ConsoleError> {
    let user = refreshed_user(&state).await?;
    let (stats, jobs) = tokio::join!(state.jobs().stats(), state.jobs().list());

    let stats = match stats {
        Ok(stats) => Some(stats),
        Err(e) if e.is_signed_out() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not load job stats");
            None
        }
    };
    let recent_jobs = match jobs {
        Ok(mut jobs) => {
            jobs.truncate(RECENT_JOBS);
            jobs
        }
        Err(e) if e.is_signed_out() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not load recent jobs");
            Vec::new()
        }
    };

    Ok(DashboardPage {
        layout: Layout::current(&state),
        user,
        stats,
        recent_jobs,
    }
    .render_html())
}

/// GET /profile
///
/// The page still renders when the Gmail status cannot be loaded.
///
/// # Errors
///
/// Returns an error (a redirect to the login page) if the backend no longer
/// accepts the session
pub async fn profile(State(state): State<ConsoleState>) -> Result<Response, ConsoleError> {
    let user = refreshed_user(&state).await?;
    let gmail = match state.gmail().status().await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Could not load Gmail status");
            None
        }
    };

    Ok(ProfilePage::new(Layout::current(&state), user, gmail).render_html())
}

/// POST /profile/gmail/connect - Start the Gmail link flow
///
/// # Errors
///
/// Returns an error if nobody is signed in
#[allow(clippy::unused_async)]
pub async fn gmail_connect(State(state): State<ConsoleState>) -> Result<Redirect, ConsoleError> {
    match state.gmail().connect() {
        Ok(redirect) => Ok(Redirect::to(redirect.url.as_str())),
        Err(IntegrationError::OAuth(_)) => Ok(Redirect::to(PROFILE_PATH)),
        Err(e) => Err(e.into()),
    }
}

/// POST /profile/gmail/disconnect
///
/// The toast reports the outcome on the profile page.
///
/// # Errors
///
/// Returns an error if nobody is signed in
pub async fn gmail_disconnect(State(state): State<ConsoleState>) -> Result<Redirect, ConsoleError> {
    match state.gmail().disconnect().await {
        Ok(_) | Err(IntegrationError::Backend(_)) => Ok(Redirect::to(PROFILE_PATH)),
        Err(e) => Err(e.into()),
    }
}

/// Current user, re-read from the backend when it is reachable
async fn refreshed_user(state: &ConsoleState) -> Result<UserProfile, ConsoleError> {
    match state.auth().refresh_profile().await {
        Ok(user) => Ok(user),
        Err(AuthError::SessionExpired) => {
            state.notifier().warning(AuthError::SessionExpired.to_string());
            Err(AuthError::SessionExpired.into())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Using cached profile");
            state
                .sessions()
                .current_user()
                .ok_or_else(|| SessionError::NotAuthenticated.into())
        }
    }
}

