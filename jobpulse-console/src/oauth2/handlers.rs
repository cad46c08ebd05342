//! OAuth2 HTTP handlers
//!
//! - `GET /auth/{provider}` sends the browser to the provider's consent screen
//! - `GET /google/callback` and `GET /github/callback` complete the attempt
//!
//! A failed callback renders an error page with a way back instead of a bare
//! error status: the user arrives here from a third-party site.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};

use super::types::{CallbackParams, FlowKind, OAuthProvider};
use crate::error::ConsoleError;
use crate::state::ConsoleState;
use crate::template::{CallbackErrorPage, Layout, PageTemplate};

/// Start sign-in with `provider`
///
/// # Errors
///
/// Returns 404 if the provider is unknown or not configured
#[allow(clippy::unused_async)]
pub async fn initiate_oauth(
    State(state): State<ConsoleState>,
    Path(provider_name): Path<String>,
) -> Result<Redirect, ConsoleError> {
    let provider = provider_name.parse::<OAuthProvider>()?;
    let redirect = state.oauth().begin_authorization(provider, FlowKind::Login)?;
    Ok(Redirect::to(redirect.url.as_str()))
}

/// `GET /google/callback`
pub async fn google_callback(
    State(state): State<ConsoleState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    handle_oauth_callback(&state, OAuthProvider::Google, &params).await
}

/// `GET /github/callback`
pub async fn github_callback(
    State(state): State<ConsoleState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    handle_oauth_callback(&state, OAuthProvider::GitHub, &params).await
}

/// Complete an attempt and answer the browser
///
/// Success redirects to the flow's landing page, where the confirmation toast
/// is shown. Failure renders the callback error page.
pub async fn handle_oauth_callback(
    state: &ConsoleState,
    provider: OAuthProvider,
    params: &CallbackParams,
) -> Response {
    match state.oauth().complete_authorization(provider, params).await {
        Ok(outcome) => Redirect::to(outcome.redirect_to()).into_response(),
        Err(e) => {
            if !e.is_callback_failure() {
                tracing::error!(provider = %provider, error = %e, "OAuth2 callback could not be processed");
            }
            let flow = FlowKind::from_received_state(provider, params.state());
            CallbackErrorPage::new(
                Layout::current(state),
                provider,
                flow,
                e.user_message(provider),
            )
            .render_html()
        }
    }
}
