//! The tab strip: one navigation history and simulated renderer per tab.
//!
//! Closing a tab does not drop it immediately. Observers and renderers may
//! still be mid-delivery when a close is requested, so closed tabs wait in
//! a queue until [`Browser::end_turn`] drops them in one place.

use std::fmt;

use tabnav_history::{NavigationHistory, SessionSnapshot};
use tabnav_menu::{BackForwardMenuModel, MenuDirection};
use tabnav_types::{PageTransition, Result, SiteInstanceId, TabnavConfig, TabnavError};
use url::Url;

use crate::renderer::SimRenderer;

/// Stable identifier of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// One browser tab.
pub struct Tab {
    pub id: TabId,
    pub history: NavigationHistory,
    pub renderer: SimRenderer,
}

impl Tab {
    /// Hand every queued renderer report to the history.
    pub fn pump(&mut self) -> usize {
        self.history.pump_reports(&mut self.renderer)
    }
}

/// A window's worth of tabs.
pub struct Browser {
    config: TabnavConfig,
    tabs: Vec<Tab>,
    active: Option<usize>,
    closing: Vec<Tab>,
    next_tab_id: u32,
    next_site: u32,
}

impl Browser {
    pub fn new(config: TabnavConfig) -> Self {
        Self {
            config,
            tabs: Vec::new(),
            active: None,
            closing: Vec::new(),
            next_tab_id: 1,
            next_site: 1,
        }
    }

    pub fn config(&self) -> &TabnavConfig {
        &self.config
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Tabs closed but not yet destroyed.
    pub fn closing_count(&self) -> usize {
        self.closing.len()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|i| self.tabs.get(i))
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        self.active.and_then(|i| self.tabs.get_mut(i))
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Make the tab at `index` in the strip active.
    pub fn activate(&mut self, index: usize) -> Result<()> {
        if index >= self.tabs.len() {
            return Err(TabnavError::Scenario(format!(
                "no tab at index {index} ({} open)",
                self.tabs.len()
            )));
        }
        self.active = Some(index);
        Ok(())
    }

    fn create_tab(
        &mut self,
        build_history: impl FnOnce(&SimRenderer) -> Result<NavigationHistory>,
    ) -> Result<usize> {
        let renderer = SimRenderer::new(SiteInstanceId(self.next_site));
        let history = build_history(&renderer)?;
        renderer.continue_after(history.max_page_id(renderer.site()));
        self.next_site += 1;

        let id = TabId(self.next_tab_id);
        self.next_tab_id += 1;
        self.tabs.push(Tab {
            id,
            history,
            renderer,
        });
        let index = self.tabs.len() - 1;
        self.active = Some(index);
        log::info!("Opened {id} at strip index {index}");
        Ok(index)
    }

    /// Open a tab, optionally loading `url`, and make it active.
    pub fn add_tab(&mut self, url: Option<Url>) -> Result<TabId> {
        let history_config = self.config.history.clone();
        let index = self.create_tab(|renderer| {
            NavigationHistory::new(renderer.host(), &history_config)
        })?;
        let tab = &mut self.tabs[index];
        if let Some(url) = url {
            tab.history.load_url(url, None, PageTransition::TYPED);
            tab.pump();
        }
        Ok(tab.id)
    }

    /// Open a copy of the tab `source`'s history and load its current entry.
    pub fn duplicate_tab(&mut self, source: TabId) -> Result<TabId> {
        let Some(source_index) = self.tabs.iter().position(|t| t.id == source) else {
            return Err(TabnavError::Scenario(format!("no such tab: {source}")));
        };
        let history_config = self.config.history.clone();
        let index = self.create_tab(|renderer| {
            NavigationHistory::new(renderer.host(), &history_config)
        })?;
        let (before, after) = self.tabs.split_at_mut(index);
        let tab = &mut after[0];
        tab.history.copy_state_from(&before[source_index].history);
        tab.renderer
            .continue_after(tab.history.max_page_id(tab.renderer.site()));
        tab.history.load_if_necessary();
        tab.pump();
        Ok(tab.id)
    }

    /// Open a tab from a saved session and load its selected entry.
    pub fn restore_tab(&mut self, snapshot: SessionSnapshot) -> Result<TabId> {
        let history_config = self.config.history.clone();
        let index = self.create_tab(|renderer| {
            NavigationHistory::from_snapshot(renderer.host(), &history_config, snapshot)
        })?;
        let tab = &mut self.tabs[index];
        tab.history.load_if_necessary();
        tab.pump();
        Ok(tab.id)
    }

    /// Remove a tab from the strip. It is destroyed by the next
    /// [`end_turn`](Self::end_turn).
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };
        let tab = self.tabs.remove(index);
        log::info!("Closing {id}");
        self.closing.push(tab);

        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        true
    }

    /// Destroy every tab closed since the last turn. Returns how many.
    pub fn end_turn(&mut self) -> usize {
        let count = self.closing.len();
        for tab in self.closing.drain(..) {
            log::debug!(
                "Destroying {} ({} entries)",
                tab.id,
                tab.history.entry_count()
            );
        }
        count
    }

    /// Answer pending repost prompts of the active tab: accepted prompts
    /// reload without asking again, declined ones are dropped.
    pub fn answer_reposts(&mut self, accept: bool) -> usize {
        let Some(tab) = self.active_tab_mut() else {
            return 0;
        };
        let mut answered = 0;
        while let Some(index) = tab.renderer.take_repost_prompt() {
            answered += 1;
            if accept {
                log::info!("Repost of entry {index} accepted");
                tab.history.reload(false);
            } else {
                log::info!("Repost of entry {index} declined");
            }
        }
        answered
    }

    // -------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------

    /// One line per entry of the active tab; `>` marks the committed entry
    /// and `~` a transient one.
    pub fn history_lines(&self) -> Vec<String> {
        let Some(tab) = self.active_tab() else {
            return Vec::new();
        };
        let history = &tab.history;
        history
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let marker = if Some(i) == history.transient_index() {
                    '~'
                } else if Some(i) == history.last_committed_index() {
                    '>'
                } else {
                    ' '
                };
                format!("{marker} {i}: {} [{}]", entry.title_for_display(), entry.transition)
            })
            .collect()
    }

    /// The active tab's menu in `direction`, one line per item.
    pub fn menu_lines(&self, direction: MenuDirection) -> Vec<String> {
        let Some(tab) = self.active_tab() else {
            return Vec::new();
        };
        let model =
            BackForwardMenuModel::with_config(&tab.history, direction, self.config.menu.clone());
        model
            .items()
            .into_iter()
            .map(|item| {
                if item.is_separator {
                    format!("{:>3}: ----", item.id)
                } else {
                    format!("{:>3}: {}", item.id, item.label)
                }
            })
            .collect()
    }
}
