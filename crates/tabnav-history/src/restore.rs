//! Session snapshots: saving a history's committed entries and rebuilding
//! a history from them.

use serde::{Deserialize, Serialize};
use tabnav_types::{HistoryConfig, PageTransition, Result, TabnavError};
use url::Url;

use crate::entry::NavigationEntry;
use crate::history::NavigationHistory;
use crate::host::NavigationHost;

// -----------------------------------------------------------------------
// TabNavigation
// -----------------------------------------------------------------------

/// The persisted form of one committed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabNavigation {
    pub url: Url,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub referrer: Option<Url>,
    #[serde(default)]
    pub transition: PageTransition,
    #[serde(default)]
    pub content_state: Vec<u8>,
    #[serde(default)]
    pub favicon_url: Option<Url>,
    #[serde(default)]
    pub has_post_data: bool,
}

impl TabNavigation {
    pub fn from_entry(entry: &NavigationEntry) -> Self {
        Self {
            url: entry.url.clone(),
            title: entry.title.clone(),
            referrer: entry.referrer.clone(),
            transition: entry.transition,
            content_state: entry.content_state.clone(),
            favicon_url: entry.favicon.url.clone(),
            has_post_data: entry.has_post_data,
        }
    }

    /// A fresh entry carrying this navigation's persisted state.
    pub fn into_entry(self) -> NavigationEntry {
        let mut entry = NavigationEntry::new(self.url, self.referrer, self.transition);
        entry.title = self.title;
        entry.content_state = self.content_state;
        entry.favicon.url = self.favicon_url;
        entry.has_post_data = self.has_post_data;
        entry
    }
}

// -----------------------------------------------------------------------
// SessionSnapshot
// -----------------------------------------------------------------------

/// A tab's saved history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub navigations: Vec<TabNavigation>,
    #[serde(default)]
    pub selected_index: usize,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// -----------------------------------------------------------------------
// NavigationHistory integration
// -----------------------------------------------------------------------

impl NavigationHistory {
    /// Rebuild a history from saved navigations.
    ///
    /// Entries get page ids `0..n`, no renderer group and a `RELOAD`
    /// transition; `selected` becomes the committed entry. Nothing is
    /// loaded until [`load_if_necessary`](Self::load_if_necessary).
    ///
    /// When more navigations are saved than the history holds, the oldest
    /// are dropped, but never the selected one.
    pub fn restore(
        host: NavigationHost,
        config: &HistoryConfig,
        navigations: Vec<TabNavigation>,
        selected: usize,
    ) -> Result<Self> {
        let mut history = Self::new(host, config)?;
        if navigations.is_empty() {
            return Ok(history);
        }
        if selected >= navigations.len() {
            return Err(TabnavError::Session(format!(
                "selected index {selected} out of range for {} navigations",
                navigations.len()
            )));
        }

        let start = navigations
            .len()
            .saturating_sub(history.max_entry_count)
            .min(selected);
        let entries: Vec<NavigationEntry> = navigations
            .into_iter()
            .skip(start)
            .take(history.max_entry_count)
            .map(TabNavigation::into_entry)
            .collect();
        history.finish_restore(entries, selected - start);
        log::info!(
            "Restored {} entries, selected {}",
            history.entries.len(),
            selected - start
        );
        Ok(history)
    }

    /// Restore from a snapshot.
    pub fn from_snapshot(
        host: NavigationHost,
        config: &HistoryConfig,
        snapshot: SessionSnapshot,
    ) -> Result<Self> {
        Self::restore(host, config, snapshot.navigations, snapshot.selected_index)
    }

    /// The committed entries in persisted form. Transient entries are
    /// skipped.
    pub fn to_tab_navigations(&self) -> Vec<TabNavigation> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.transient_index)
            .map(|(_, entry)| TabNavigation::from_entry(entry))
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            navigations: self.to_tab_navigations(),
            selected_index: self.last_committed_index.unwrap_or(0),
        }
    }

    /// Fill an empty history with copies of `other`'s committed entries,
    /// as when duplicating a tab. The copy needs
    /// [`load_if_necessary`](Self::load_if_necessary) like a restored one.
    ///
    /// # Panics
    ///
    /// Panics if this history already has entries.
    pub fn copy_state_from(&mut self, other: &NavigationHistory) {
        assert!(
            self.entries.is_empty(),
            "copy_state_from into a history that already has entries"
        );
        let Some(selected) = other.last_committed_index else {
            return;
        };
        let entries: Vec<NavigationEntry> = other
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != other.transient_index)
            .map(|(_, entry)| entry.clone_with_new_unique_id())
            .collect();
        // The transient entry always sits after the committed one.
        self.finish_restore(entries, selected);
    }

    fn finish_restore(&mut self, mut entries: Vec<NavigationEntry>, selected: usize) {
        for (page_id, entry) in (0..).zip(entries.iter_mut()) {
            entry.page_id = page_id;
            entry.site_instance = None;
            entry.transition = PageTransition::RELOAD;
        }
        self.tab_max_page_id = i32::try_from(entries.len()).map_or(i32::MAX, |n| n - 1);
        self.entries = entries;
        self.bump_generation();
        self.last_committed_index = Some(selected);
        self.needs_reload = true;
    }
}
