//! Authentication handlers (login, register, logout)
//!
//! ```rust,no_run
//! use axum::{routing::{get, post}, Router};
//! use jobpulse_console::handlers::auth::{login_page, login_post, logout_post};
//! use jobpulse_console::state::ConsoleState;
//!
//! # fn example(state: ConsoleState) {
//! let app: Router = Router::new()
//!     .route("/login", get(login_page).post(login_post))
//!     .route("/logout", post(logout_post))
//!     .with_state(state);
//! # }
//! ```

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::auth::{AuthError, LoginForm, RegisterForm};
use crate::error::ConsoleError;
use crate::middleware::{HOME_PATH, LOGIN_PATH};
use crate::state::ConsoleState;
use crate::template::{LoginPage, PageTemplate};

/// GET /login - Display the sign-in form
#[allow(clippy::unused_async)]
pub async fn login_page(State(state): State<ConsoleState>) -> Response {
    LoginPage::new(&state, false).render_html()
}

/// POST /login - Sign in with username and password
///
/// Validation and credential errors re-render the form with the message and
/// the username kept.
pub async fn login_post(State(state): State<ConsoleState>, Form(form): Form<LoginForm>) -> Response {
    match state.auth().login(&form).await {
        Ok(session) => {
            tracing::info!(user = %session.user.username, "User signed in");
            Redirect::to(HOME_PATH).into_response()
        }
        Err(e) => form_error(&state, false, e, &form.username, ""),
    }
}

/// GET /register - Display the sign-up form
#[allow(clippy::unused_async)]
pub async fn register_page(State(state): State<ConsoleState>) -> Response {
    LoginPage::new(&state, true).render_html()
}

/// POST /register - Create an account and sign in
pub async fn register_post(
    State(state): State<ConsoleState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    match state.auth().register(&form).await {
        Ok(session) => {
            tracing::info!(user = %session.user.username, "Account created");
            Redirect::to(HOME_PATH).into_response()
        }
        Err(e) => form_error(&state, true, e, &form.username, &form.email),
    }
}

/// POST /logout - Sign out
///
/// # Errors
///
/// Returns an error if the session cannot be removed from storage
#[allow(clippy::unused_async)]
pub async fn logout_post(State(state): State<ConsoleState>) -> Result<Redirect, ConsoleError> {
    state.auth().logout()?;
    Ok(Redirect::to(LOGIN_PATH))
}

fn form_error(
    state: &ConsoleState,
    register: bool,
    error: AuthError,
    username: &str,
    email: &str,
) -> Response {
    if !error.is_user_facing() {
        return ConsoleError::from(error).into_response();
    }

    LoginPage::new(state, register)
        .with_error(error.to_string())
        .with_values(username, email)
        .render_html()
}
