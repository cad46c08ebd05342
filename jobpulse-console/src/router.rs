//! Route table
//!
//! | Route | Access |
//! |-------|--------|
//! | `GET /login`, `GET /register`, `GET /auth/{provider}` | signed out |
//! | `GET /dashboard`, `GET /profile`, Gmail connect/disconnect | signed in |
//! | `/jobs`, `/jobs/create`, `/jobs/{id}` and its actions, `/dead-letter` | signed in |
//! | OAuth2 callbacks, preference toggles, `POST /logout` | anyone |

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{self, account, auth, jobs, preferences};
use crate::middleware::{require_guest, require_session};
use crate::oauth2::handlers::{github_callback, google_callback, initiate_oauth};
use crate::state::ConsoleState;

/// Build the console router
pub fn build(state: ConsoleState) -> Router {
    let timeout = Duration::from_secs(state.config().server.request_timeout_secs);

    let signed_in = Router::new()
        .route("/dashboard", get(account::dashboard))
        .route("/profile", get(account::profile))
        .route("/profile/gmail/connect", post(account::gmail_connect))
        .route("/profile/gmail/disconnect", post(account::gmail_disconnect))
        .route("/jobs", get(jobs::job_list))
        .route("/jobs/create", get(jobs::create_page).post(jobs::create_post))
        .route("/jobs/{id}", get(jobs::job_detail))
        .route("/jobs/{id}/pause", post(jobs::pause))
        .route("/jobs/{id}/resume", post(jobs::resume))
        .route("/jobs/{id}/delete", post(jobs::delete))
        .route("/dead-letter", get(jobs::dead_letter))
        .route("/dead-letter/{id}/replay", post(jobs::replay))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let signed_out = Router::new()
        .route("/login", get(auth::login_page).post(auth::login_post))
        .route("/register", get(auth::register_page).post(auth::register_post))
        .route("/auth/{provider}", get(initiate_oauth))
        .route_layer(from_fn_with_state(state.clone(), require_guest));

    Router::new()
        .route("/", get(handlers::index))
        .route("/logout", post(auth::logout_post))
        .route("/google/callback", get(google_callback))
        .route("/github/callback", get(github_callback))
        .route("/preferences/theme", post(preferences::toggle_theme))
        .route("/preferences/sidebar", post(preferences::toggle_sidebar))
        .merge(signed_in)
        .merge(signed_out)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
