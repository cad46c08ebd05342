//! Page handlers
//!
//! OAuth2 routes live in [`crate::oauth2::handlers`].

pub mod account;
pub mod auth;
pub mod jobs;
pub mod preferences;

use axum::{
    http::{header::REFERER, HeaderMap},
    response::Redirect,
};
use url::Url;

use crate::middleware::HOME_PATH;
use crate::state::ConsoleState;

/// `GET /` - the dashboard is the home page
#[allow(clippy::unused_async)]
pub async fn index() -> Redirect {
    Redirect::to(HOME_PATH)
}

/// Fallback for unknown paths
#[allow(clippy::unused_async)]
pub async fn not_found(uri: axum::http::Uri) -> crate::error::ConsoleError {
    crate::error::ConsoleError::NotFound(uri.path().to_string())
}

/// Path of the referring console page, or `fallback`
///
/// Referers from other origins are ignored.
fn back_to(state: &ConsoleState, headers: &HeaderMap, fallback: &str) -> String {
    let Ok(origin) = state.config().origin_url() else {
        return fallback.to_string();
    };

    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|r| Url::parse(r).ok())
        .filter(|r| r.origin() == origin.origin())
        .map_or_else(
            || fallback.to_string(),
            |r| match r.query() {
                Some(query) => format!("{}?{query}", r.path()),
                None => r.path().to_string(),
            },
        )
}
