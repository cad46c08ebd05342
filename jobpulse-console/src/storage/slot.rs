//! Named storage slots

use std::borrow::Cow;

use crate::oauth2::OAuthProvider;

/// Lifetime of a slot's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotScope {
    /// Survives console restarts
    Durable,
    /// Cleared when the console process exits
    Session,
}

/// A named piece of client-side state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Backend access token of the signed-in user
    Token,
    /// Identity projection of the signed-in user
    User,
    /// Colour theme preference
    Theme,
    /// Sidebar collapse state
    Sidebar,
    /// Pending OAuth state token for a provider
    OAuthState(OAuthProvider),
}

impl Slot {
    /// Storage key for this slot
    #[must_use]
    pub fn key(self) -> Cow<'static, str> {
        match self {
            Self::Token => Cow::Borrowed("jobpulse_token"),
            Self::User => Cow::Borrowed("jobpulse_user"),
            Self::Theme => Cow::Borrowed("jp-theme"),
            Self::Sidebar => Cow::Borrowed("jp-sidebar"),
            Self::OAuthState(provider) => Cow::Owned(format!("{provider}_oauth_state")),
        }
    }

    /// Scope the slot lives in
    #[must_use]
    pub const fn scope(self) -> SlotScope {
        match self {
            Self::Token | Self::User | Self::Theme | Self::Sidebar => SlotScope::Durable,
            Self::OAuthState(_) => SlotScope::Session,
        }
    }
}
