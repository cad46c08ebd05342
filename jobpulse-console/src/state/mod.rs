//! Application state
//!
//! [`ConsoleState`] wires storage, the session store, the notifier and the
//! backend client into the services handlers use. It is cheap to clone; every
//! part is shared.

use std::sync::Arc;

use crate::auth::{AuthService, SessionStore};
use crate::backend::{BackendApi, HttpBackend};
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::integrations::GmailIntegration;
use crate::jobs::JobService;
use crate::notify::Notifier;
use crate::oauth2::OAuthCoordinator;
use crate::preferences::Preferences;
use crate::storage::{FileStore, MemoryStore, Storage};

/// Application state shared by all handlers
///
/// # Example
///
/// ```rust,no_run
/// use jobpulse_console::{config::ConsoleConfig, state::ConsoleState};
///
/// # fn example() -> anyhow::Result<()> {
/// let state = ConsoleState::new(ConsoleConfig::load(None)?)?;
/// let app = jobpulse_console::router::build(state);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConsoleState {
    config: Arc<ConsoleConfig>,
    sessions: SessionStore,
    notifier: Notifier,
    preferences: Preferences,
    auth: AuthService,
    oauth: OAuthCoordinator,
    gmail: GmailIntegration,
    jobs: JobService,
}

impl ConsoleState {
    /// Build the state from configuration
    ///
    /// Opens the durable store in the configured data directory and talks to
    /// the configured backend over HTTP.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let durable = FileStore::open(config.storage.durable_store_path())?;
        let storage = Storage::new(durable, MemoryStore::new());
        let backend = HttpBackend::new(&config.backend)?;

        Self::with_parts(config, storage, Arc::new(backend))
    }

    /// Build the state from explicit storage and backend
    pub fn with_parts(
        config: ConsoleConfig,
        storage: Storage,
        backend: Arc<dyn BackendApi>,
    ) -> Result<Self, ConsoleError> {
        let origin = config.origin_url()?;
        let sessions = SessionStore::load(storage.clone())?;
        let notifier = Notifier::new();

        let oauth = OAuthCoordinator::new(
            config.oauth2.clone(),
            &origin,
            storage.clone(),
            sessions.clone(),
            notifier.clone(),
            backend.clone(),
        )?;
        let auth = AuthService::new(backend.clone(), sessions.clone(), notifier.clone());
        let gmail = GmailIntegration::new(
            backend.clone(),
            sessions.clone(),
            oauth.clone(),
            notifier.clone(),
        );
        let jobs = JobService::new(backend, sessions.clone(), notifier.clone());

        Ok(Self {
            config: Arc::new(config),
            sessions,
            notifier,
            preferences: Preferences::new(storage),
            auth,
            oauth,
            gmail,
            jobs,
        })
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Current-session store
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Toast publisher
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// UI preferences
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Password authentication
    #[must_use]
    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// OAuth2 coordinator
    #[must_use]
    pub const fn oauth(&self) -> &OAuthCoordinator {
        &self.oauth
    }

    /// Gmail integration
    #[must_use]
    pub const fn gmail(&self) -> &GmailIntegration {
        &self.gmail
    }

    /// Job management
    #[must_use]
    pub const fn jobs(&self) -> &JobService {
        &self.jobs
    }
}

impl std::fmt::Debug for ConsoleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleState")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
