//! `jobpulse-console`: local dashboard for the `JobPulse` job scheduler
//!
//! The console is a small axum server the operator runs next to their
//! browser. It signs the user in against the JobPulse backend (password,
//! Google or GitHub), keeps the resulting session, and manages the Gmail
//! integration that email jobs send through.
//!
//! # Architecture
//!
//! - [`storage`]: typed slots over a durable JSON file and process memory
//! - [`auth`]: the session store and password sign-in
//! - [`oauth2`]: the authorization-code coordinator for Google and GitHub
//! - [`integrations`]: Gmail status, connect and disconnect
//! - [`notify`]: toasts shown on the next rendered page
//! - [`backend`]: the REST client for the JobPulse API
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jobpulse_console::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     jobpulse_console::observability::init()?;
//!
//!     let config = ConsoleConfig::load(None)?;
//!     let bind = config.server.bind;
//!     let app = router::build(ConsoleState::new(config)?);
//!
//!     let listener = tokio::net::TcpListener::bind(bind).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
// Additional crate-specific allows:
#![allow(clippy::missing_errors_doc)]

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod integrations;
pub mod jobs;
pub mod middleware;
pub mod notify;
pub mod oauth2;
pub mod observability;
pub mod preferences;
pub mod router;
pub mod state;
pub mod storage;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use jobpulse_console::prelude::*;
    //! ```

    pub use crate::router;

    // Configuration and state
    pub use crate::config::{ConfigError, ConsoleConfig};
    pub use crate::state::ConsoleState;

    // Error types
    pub use crate::error::ConsoleError;

    // Sessions and authentication
    pub use crate::auth::{AuthService, Session, SessionStore, UserProfile};

    // OAuth2
    pub use crate::oauth2::{
        AuthorizationOutcome, CallbackParams, FlowKind, OAuthConfig, OAuthCoordinator, OAuthError,
        OAuthProvider, ProviderConfig,
    };

    // Backend
    pub use crate::backend::{BackendApi, BackendError, HttpBackend};

    // Storage and notifications
    pub use crate::notify::{Notifier, Toast, ToastLevel};
    pub use crate::storage::{Slot, Storage, StorageError};

    // Re-export key dependencies
    pub use askama;
    pub use axum;
}
