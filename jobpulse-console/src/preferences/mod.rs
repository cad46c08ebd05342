//! Persisted UI preferences (theme, sidebar)

use serde::{Deserialize, Serialize};

use crate::storage::{Slot, Storage, StorageResult};

/// Colour theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark theme
    #[default]
    Dark,
    /// Light theme
    Light,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Value of the `data-theme` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Sidebar collapse state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarState {
    /// Full-width sidebar
    #[default]
    Expanded,
    /// Icon-only sidebar
    Collapsed,
}

impl SidebarState {
    /// The other state
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }

    /// Whether the sidebar is collapsed
    #[must_use]
    pub const fn is_collapsed(self) -> bool {
        matches!(self, Self::Collapsed)
    }
}

/// Reads and writes preferences in durable storage
#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    /// Create preferences over `storage`
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Current theme; unreadable values fall back to the default
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.read(&Slot::Theme)
    }

    /// Switch between dark and light, returning the new theme
    pub fn toggle_theme(&self) -> StorageResult<Theme> {
        let theme = self.theme().toggled();
        self.storage.set(&Slot::Theme, &theme)?;
        tracing::debug!(theme = theme.as_str(), "Theme changed");
        Ok(theme)
    }

    /// Current sidebar state; unreadable values fall back to the default
    #[must_use]
    pub fn sidebar(&self) -> SidebarState {
        self.read(&Slot::Sidebar)
    }

    /// Collapse or expand the sidebar, returning the new state
    pub fn toggle_sidebar(&self) -> StorageResult<SidebarState> {
        let sidebar = self.sidebar().toggled();
        self.storage.set(&Slot::Sidebar, &sidebar)?;
        Ok(sidebar)
    }

    fn read<T>(&self, slot: &Slot) -> T
    where
        T: Default + serde::de::DeserializeOwned,
    {
        self.storage
            .get(slot)
            .unwrap_or_else(|e| {
                tracing::warn!(slot = %slot.key(), error = %e, "Ignoring unreadable preference");
                None
            })
            .unwrap_or_default()
    }
}
