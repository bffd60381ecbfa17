//! Configuration for the history engine and the back/forward menus.
//!
//! Every field has a default, so an empty TOML document (or no file at
//! all) yields the stock browser behaviour.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{Result, TabnavError};

/// Top-level configuration (`tabnav.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabnavConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub menu: MenuConfig,
}

/// Limits and defaults of one tab's navigation history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Hard cap on committed entries; the oldest entry is evicted beyond it.
    #[serde(default = "default_max_entry_count")]
    pub max_entry_count: usize,
    /// Ask for confirmation before reloading an entry with POST data.
    #[serde(default = "yes")]
    pub check_for_repost: bool,
    /// Page loaded when the last entry of a tab is removed.
    #[serde(default = "default_url")]
    pub default_url: String,
}

/// Shape of the back/forward drop-down menus.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuConfig {
    /// Recent entries listed next to the current one.
    #[serde(default = "default_max_history_items")]
    pub max_history_items: usize,
    /// Same-site landmarks listed after the recent entries.
    #[serde(default = "default_max_chapter_stops")]
    pub max_chapter_stops: usize,
    /// Labels longer than this many characters are elided.
    #[serde(default = "default_max_label_chars")]
    pub max_label_chars: usize,
}

fn default_max_entry_count() -> usize {
    50
}
fn yes() -> bool {
    true
}
fn default_url() -> String {
    "about:blank".to_string()
}
fn default_max_history_items() -> usize {
    12
}
fn default_max_chapter_stops() -> usize {
    5
}
fn default_max_label_chars() -> usize {
    700
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entry_count: default_max_entry_count(),
            check_for_repost: true,
            default_url: default_url(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            max_history_items: default_max_history_items(),
            max_chapter_stops: default_max_chapter_stops(),
            max_label_chars: default_max_label_chars(),
        }
    }
}

impl HistoryConfig {
    /// The default URL, parsed.
    pub fn default_url(&self) -> Result<Url> {
        Url::parse(&self.default_url)
            .map_err(|e| TabnavError::Config(format!("default_url {:?}: {e}", self.default_url)))
    }

    fn validate(&self) -> Result<()> {
        if self.max_entry_count == 0 {
            return Err(TabnavError::Config(
                "history.max_entry_count must be at least 1".into(),
            ));
        }
        self.default_url().map(|_| ())
    }
}

impl MenuConfig {
    fn validate(&self) -> Result<()> {
        if self.max_history_items == 0 {
            return Err(TabnavError::Config(
                "menu.max_history_items must be at least 1".into(),
            ));
        }
        if self.max_label_chars < 4 {
            return Err(TabnavError::Config(
                "menu.max_label_chars must leave room for an ellipsis".into(),
            ));
        }
        Ok(())
    }
}

impl TabnavConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.history.validate()?;
        self.menu.validate()
    }
}
