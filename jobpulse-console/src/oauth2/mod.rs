//! OAuth2 sign-in and account linking
//!
//! Supports Google and GitHub. The console only runs the browser side of the
//! authorization-code flow; the backend exchanges codes for tokens.
//!
//! # Routes
//!
//! - `GET /auth/{provider}` starts sign-in
//! - `GET /google/callback` and `GET /github/callback` finish it
//!
//! Connecting Gmail reuses the Google callback with the reserved state
//! [`LINK_STATE_SENTINEL`].

mod attempt;
pub mod coordinator;
pub mod handlers;
pub mod providers;
pub mod types;

pub use attempt::AttemptPhase;
pub use coordinator::OAuthCoordinator;
pub use handlers::{handle_oauth_callback, initiate_oauth};
pub use providers::{GitHubProvider, GoogleProvider, ProviderRegistry};
pub use types::{
    AuthorizationOutcome, AuthorizationRedirect, AuthorizationState, CallbackParams, FlowKind,
    OAuthConfig, OAuthError, OAuthProvider, ProviderConfig, LINK_STATE_SENTINEL,
};
