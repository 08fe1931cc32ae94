//! User preferences that survive restarts.

use anyhow::Result;
use tracing::{debug, warn};

pub const THEME_KEY: &str = "theme";

/// Small string key-value storage for preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Icon of the toggle control: offers the opposite theme.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Anything but a stored `dark` means light, read errors included.
    pub fn restore(store: &dyn PreferenceStore) -> Theme {
        match store.get(THEME_KEY) {
            Ok(Some(value)) if value == "dark" => Theme::Dark,
            Ok(_) => Theme::Light,
            Err(e) => {
                warn!(error = %e, "Could not read theme preference");
                Theme::Light
            }
        }
    }

    pub fn persist(&self, store: &dyn PreferenceStore) -> Result<()> {
        debug!(theme = self.as_str(), "Saving theme preference");
        store.set(THEME_KEY, self.as_str())
    }
}
