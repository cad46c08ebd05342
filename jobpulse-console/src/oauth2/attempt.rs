//! Lifecycle of a single authorization attempt
//!
//! ```text
//! IDLE ─begin─▶ REDIRECTING ─(browser leaves)─▶ AWAITING_CALLBACK
//!   AWAITING_CALLBACK ─▶ VERIFYING_STATE ─▶ EXCHANGING_CODE ─▶ SUCCEEDED
//!   any non-terminal phase ─▶ FAILED
//! ```
//!
//! `SUCCEEDED` and `FAILED` are terminal. An attempt is never retried; the user
//! starts a new one.

use std::fmt;
use std::time::Instant;

use super::types::{FlowKind, OAuthProvider};

/// Phase of an authorization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptPhase {
    /// Nothing started yet
    Idle,
    /// State stored, consent URL handed out
    Redirecting,
    /// Callback request received
    AwaitingCallback,
    /// Comparing the received state with the stored one
    VerifyingState,
    /// Waiting for the backend to exchange the code
    ExchangingCode,
    /// Session established or account linked
    Succeeded,
    /// Ended with an error
    Failed,
}

impl AttemptPhase {
    /// Whether the attempt is over
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether `next` is a legal successor of this phase
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle, Self::Redirecting)
            | (Self::Redirecting, Self::AwaitingCallback)
            | (Self::AwaitingCallback, Self::VerifyingState)
            | (Self::VerifyingState, Self::ExchangingCode)
            | (Self::ExchangingCode, Self::Succeeded) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Redirecting => "REDIRECTING",
            Self::AwaitingCallback => "AWAITING_CALLBACK",
            Self::VerifyingState => "VERIFYING_STATE",
            Self::ExchangingCode => "EXCHANGING_CODE",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One authorization attempt, tracked for logging
#[derive(Debug)]
pub struct Attempt {
    provider: OAuthProvider,
    flow: FlowKind,
    phase: AttemptPhase,
    started: Instant,
}

impl Attempt {
    /// Attempt that is about to redirect to the provider
    #[must_use]
    pub fn begin(provider: OAuthProvider, flow: FlowKind) -> Self {
        Self::at(provider, flow, AttemptPhase::Idle)
    }

    /// Attempt picked up at its callback
    #[must_use]
    pub fn from_callback(provider: OAuthProvider, flow: FlowKind) -> Self {
        Self::at(provider, flow, AttemptPhase::AwaitingCallback)
    }

    fn at(provider: OAuthProvider, flow: FlowKind, phase: AttemptPhase) -> Self {
        Self {
            provider,
            flow,
            phase,
            started: Instant::now(),
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> AttemptPhase {
        self.phase
    }

    /// Flow of this attempt
    #[must_use]
    pub const fn flow(&self) -> FlowKind {
        self.flow
    }

    /// Move to `next`
    ///
    /// Illegal transitions are a programming error: they trip a debug
    /// assertion and are otherwise ignored.
    pub fn advance(&mut self, next: AttemptPhase) {
        let legal = self.phase.can_advance_to(next);
        debug_assert!(legal, "illegal attempt transition {} -> {next}", self.phase);
        if !legal {
            tracing::error!(from = %self.phase, to = %next, "Illegal OAuth attempt transition");
            return;
        }

        tracing::debug!(
            provider = %self.provider,
            flow = ?self.flow,
            from = %self.phase,
            to = %next,
            elapsed_ms = self.started.elapsed().as_millis(),
            "OAuth attempt advanced"
        );
        self.phase = next;
    }
}
