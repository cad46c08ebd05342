//! Route guards for signed-in and signed-out pages
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use jobpulse_console::middleware::require_session;
//! use jobpulse_console::state::ConsoleState;
//!
//! # fn example(state: ConsoleState) {
//! let app: Router = Router::new()
//!     .route("/dashboard", get(|| async { "Dashboard" }))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
//!     .with_state(state);
//! # }
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::ConsoleState;

/// Where signed-out users are sent
pub const LOGIN_PATH: &str = "/login";

/// Where signed-in users are sent away from the sign-in pages
pub const HOME_PATH: &str = "/dashboard";

/// Let the request through only when a user is signed in
///
/// HTMX requests get a 401 with an `HX-Redirect` header so the page navigates
/// as a whole instead of swapping the login form into a fragment.
pub async fn require_session(
    State(state): State<ConsoleState>,
    request: Request,
    next: Next,
) -> Result<Response, GuardRejection> {
    if state.sessions().is_authenticated() {
        return Ok(next.run(request).await);
    }

    tracing::debug!(path = %request.uri().path(), "Signed-out request to protected page");
    Err(GuardRejection::for_request(request.headers(), LOGIN_PATH))
}

/// Let the request through only when nobody is signed in
pub async fn require_guest(
    State(state): State<ConsoleState>,
    request: Request,
    next: Next,
) -> Result<Response, GuardRejection> {
    if state.sessions().is_authenticated() {
        return Err(GuardRejection::for_request(request.headers(), HOME_PATH));
    }
    Ok(next.run(request).await)
}

/// Rejection produced by a route guard
#[derive(Debug)]
pub enum GuardRejection {
    /// HTMX request: 401 carrying the target in `HX-Redirect`
    HxRedirect(&'static str),
    /// Regular request: 303 to the target
    Redirect(&'static str),
}

impl GuardRejection {
    fn for_request(headers: &HeaderMap, target: &'static str) -> Self {
        let is_htmx = headers
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            == Some("true");

        if is_htmx {
            Self::HxRedirect(target)
        } else {
            Self::Redirect(target)
        }
    }
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::HxRedirect(target) => {
                (StatusCode::UNAUTHORIZED, [("HX-Redirect", target)], "Unauthorized").into_response()
            }
            Self::Redirect(target) => Redirect::to(target).into_response(),
        }
    }
}
