//! User-facing notifications
//!
//! Components publish [`Toast`]s through a [`Notifier`] without knowing who
//! shows them. Every toast goes two ways:
//!
//! - to live subscribers on a `tokio::sync::broadcast` channel
//! - into a bounded pending queue that the next rendered page drains, the way
//!   flash messages survive a redirect
//!
//! Publishing never fails and never blocks.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Toasts kept for the next page render
const PENDING_CAPACITY: usize = 16;

/// Buffer of the live broadcast channel
const CHANNEL_CAPACITY: usize = 64;

/// Toast severity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Success message (green)
    Success,
    /// Error message (red)
    Error,
    /// Informational message (blue)
    Info,
    /// Warning message (yellow)
    Warning,
}

impl ToastLevel {
    /// How long the toast stays on screen
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Success | Self::Info => Duration::from_millis(3000),
            Self::Error => Duration::from_millis(5000),
            Self::Warning => Duration::from_millis(4000),
        }
    }

    /// CSS class for this level
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
            Self::Info => "toast-info",
            Self::Warning => "toast-warning",
        }
    }
}

/// A transient user-facing message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    /// Message level
    pub level: ToastLevel,
    /// Message text
    pub message: String,
}

impl Toast {
    /// Create a toast
    #[must_use]
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Display duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u128 {
        self.level.duration().as_millis()
    }

    /// CSS class for this toast
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

/// Fire-and-forget toast publisher
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Toast>,
    pending: Arc<Mutex<VecDeque<Toast>>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Create a notifier with no subscribers
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            pending: Arc::new(Mutex::new(VecDeque::with_capacity(PENDING_CAPACITY))),
        }
    }

    /// Follow toasts as they are published
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    /// Publish a toast
    pub fn notify(&self, toast: Toast) {
        tracing::debug!(level = ?toast.level, message = %toast.message, "Toast published");

        {
            let mut pending = self.pending.lock();
            if pending.len() == PENDING_CAPACITY {
                pending.pop_front();
            }
            pending.push_back(toast.clone());
        }

        // No live subscribers is fine.
        let _ = self.tx.send(toast);
    }

    /// Publish a success toast
    pub fn success(&self, message: impl Into<String>) {
        self.notify(Toast::new(ToastLevel::Success, message));
    }

    /// Publish an error toast
    pub fn error(&self, message: impl Into<String>) {
        self.notify(Toast::new(ToastLevel::Error, message));
    }

    /// Publish an info toast
    pub fn info(&self, message: impl Into<String>) {
        self.notify(Toast::new(ToastLevel::Info, message));
    }

    /// Publish a warning toast
    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Toast::new(ToastLevel::Warning, message));
    }

    /// Drain the toasts waiting for the next page render
    #[must_use]
    pub fn take_pending(&self) -> Vec<Toast> {
        self.pending.lock().drain(..).collect()
    }
}
