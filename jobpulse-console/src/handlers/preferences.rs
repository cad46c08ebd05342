//! Theme and sidebar toggles
//!
//! Both toggles redirect back to the page they were submitted from, as long
//! as that page belongs to the console.

use axum::{extract::State, http::HeaderMap, response::Redirect};

use super::back_to;
use crate::error::ConsoleError;
use crate::middleware::HOME_PATH;
use crate::state::ConsoleState;

/// POST /preferences/theme
///
/// # Errors
///
/// Returns an error if the preference cannot be stored
#[allow(clippy::unused_async)]
pub async fn toggle_theme(
    State(state): State<ConsoleState>,
    headers: HeaderMap,
) -> Result<Redirect, ConsoleError> {
    state.preferences().toggle_theme()?;
    Ok(Redirect::to(&back_to(&state, &headers, HOME_PATH)))
}

/// POST /preferences/sidebar
///
/// # Errors
///
/// Returns an error if the preference cannot be stored
#[allow(clippy::unused_async)]
pub async fn toggle_sidebar(
    State(state): State<ConsoleState>,
    headers: HeaderMap,
) -> Result<Redirect, ConsoleError> {
    state.preferences().toggle_sidebar()?;
    Ok(Redirect::to(&back_to(&state, &headers, HOME_PATH)))
}
