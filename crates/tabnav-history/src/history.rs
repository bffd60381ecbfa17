//! The per-tab navigation history: entry list, pending and transient
//! entries, back/forward/goto and pruning.
//!
//! Commit handling (turning renderer reports into list changes) lives in
//! [`commit`](crate::commit); session restore in [`restore`](crate::restore).

use std::collections::HashMap;

use tabnav_types::{
    HistoryConfig, INVALID_PAGE_ID, PageTransition, Result, SiteInstanceId, TabnavError,
};
use url::Url;

use crate::entry::NavigationEntry;
use crate::events::{
    EntryHandle, NavigationEvent, NavigationObserver, ObserverId, ObserverList, PrunedDetails,
};
use crate::host::NavigationHost;

// -----------------------------------------------------------------------
// Pending
// -----------------------------------------------------------------------

/// The in-flight navigation, if any. Exactly one mode is active.
#[derive(Debug)]
pub(crate) enum Pending {
    None,
    /// A fresh load. The entry is owned here until it commits or is dropped.
    New(Box<NavigationEntry>),
    /// Back/forward/reload to the entry at this index.
    Existing(usize),
}

// -----------------------------------------------------------------------
// NavigationHistory
// -----------------------------------------------------------------------

/// Ordered back/forward list of one browsing context.
///
/// Index `i` is reachable from `i - 1` by going forward and from `i + 1` by
/// going back. The history is driven from a single thread: it owns boxed,
/// non-`Send` host collaborators, so the compiler keeps it there.
///
/// Calls that start a navigation (`load_url`, `go_back`, `reload`, ...)
/// only record pending state and ask the host to load; the entry list
/// changes when the renderer's report reaches
/// [`renderer_did_navigate`](Self::renderer_did_navigate).
pub struct NavigationHistory {
    pub(crate) entries: Vec<NavigationEntry>,
    pub(crate) last_committed_index: Option<usize>,
    pub(crate) pending: Pending,
    pub(crate) transient_index: Option<usize>,
    pub(crate) max_entry_count: usize,
    /// Highest page id seen per renderer group.
    pub(crate) max_page_ids: HashMap<SiteInstanceId, i32>,
    /// Highest page id of entries without a renderer group (restored or
    /// synthesized by `commit_pending_entry`).
    pub(crate) tab_max_page_id: i32,
    pub(crate) check_for_repost: bool,
    pub(crate) default_url: Url,
    /// Bumped on every structural change to `entries`.
    pub(crate) generation: u64,
    /// Set by restore: the selected entry has not been loaded yet.
    pub(crate) needs_reload: bool,
    pub(crate) observers: ObserverList,
    pub(crate) host: NavigationHost,
}

impl NavigationHistory {
    /// Create an empty history.
    pub fn new(host: NavigationHost, config: &HistoryConfig) -> Result<Self> {
        if config.max_entry_count == 0 {
            return Err(TabnavError::Config(
                "history.max_entry_count must be at least 1".into(),
            ));
        }
        Ok(Self {
            entries: Vec::new(),
            last_committed_index: None,
            pending: Pending::None,
            transient_index: None,
            max_entry_count: config.max_entry_count,
            max_page_ids: HashMap::new(),
            tab_max_page_id: INVALID_PAGE_ID,
            check_for_repost: config.check_for_repost,
            default_url: config.default_url()?,
            generation: 0,
            needs_reload: false,
            observers: ObserverList::default(),
            host,
        })
    }

    // -------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------

    /// Subscribe to navigation events.
    pub fn add_observer(&mut self, observer: Box<dyn NavigationObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    /// Unsubscribe, handing the observer back.
    pub fn remove_observer(&mut self, id: ObserverId) -> Option<Box<dyn NavigationObserver>> {
        self.observers.remove(id)
    }

    pub(crate) fn notify(&mut self, event: NavigationEvent) {
        self.observers.notify(&event);
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Number of entries, including a transient entry if one is shown.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// All entries in chronological order.
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn entry_at_index(&self, index: usize) -> Option<&NavigationEntry> {
        self.entries.get(index)
    }

    /// Entry `offset` steps away from the current one (transient entry if
    /// shown, otherwise the last committed entry).
    pub fn entry_at_offset(&self, offset: isize) -> Option<&NavigationEntry> {
        let index = self.offset_index(offset)?;
        self.entries.get(index)
    }

    pub fn last_committed_index(&self) -> Option<usize> {
        self.last_committed_index
    }

    pub fn last_committed_entry(&self) -> Option<&NavigationEntry> {
        self.last_committed_index.and_then(|i| self.entries.get(i))
    }

    /// The pending entry, whether fresh or an existing list entry.
    pub fn pending_entry(&self) -> Option<&NavigationEntry> {
        match &self.pending {
            Pending::None => None,
            Pending::New(entry) => Some(entry),
            Pending::Existing(index) => self.entries.get(*index),
        }
    }

    /// Index of the pending entry when it is an existing list entry.
    pub fn pending_index(&self) -> Option<usize> {
        match self.pending {
            Pending::Existing(index) => Some(index),
            _ => None,
        }
    }

    /// The pending entry when it is a fresh load not yet in the list.
    pub fn pending_new_entry(&self) -> Option<&NavigationEntry> {
        match &self.pending {
            Pending::New(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn transient_index(&self) -> Option<usize> {
        self.transient_index
    }

    pub fn transient_entry(&self) -> Option<&NavigationEntry> {
        self.transient_index.and_then(|i| self.entries.get(i))
    }

    /// What the tab shows: transient entry, else pending, else committed.
    pub fn active_entry(&self) -> Option<&NavigationEntry> {
        self.transient_entry()
            .or_else(|| self.pending_entry())
            .or_else(|| self.last_committed_entry())
    }

    /// Index the back/forward buttons are relative to: transient entry,
    /// else pending existing entry, else last committed entry.
    pub fn current_entry_index(&self) -> Option<usize> {
        self.transient_index
            .or(self.pending_index())
            .or(self.last_committed_index)
    }

    pub fn max_entry_count(&self) -> usize {
        self.max_entry_count
    }

    /// Whether a restored history still has to load its selected entry.
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Highest page id seen for `site`.
    ///
    /// A renderer group seen for the first time inherits the tab-level
    /// maximum, so restored page ids are never mistaken for new pages.
    pub fn max_page_id(&self, site: SiteInstanceId) -> i32 {
        self.max_page_ids
            .get(&site)
            .copied()
            .unwrap_or(self.tab_max_page_id)
    }

    pub(crate) fn update_max_page_id(&mut self, site: Option<SiteInstanceId>, page_id: i32) {
        match site {
            Some(site) => {
                let max = self.max_page_id(site).max(page_id);
                self.max_page_ids.insert(site, max);
            }
            None => self.tab_max_page_id = self.tab_max_page_id.max(page_id),
        }
    }

    /// Index of the newest entry with this renderer group and page id.
    pub fn index_of_entry_with_page_id(
        &self,
        site: Option<SiteInstanceId>,
        page_id: i32,
    ) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| e.site_instance == site && e.page_id == page_id)
    }

    /// Index of the entry a commit report for `page_id` in `site` refers to.
    ///
    /// In-page entries share the page id of the page they were cloned from,
    /// so the target of a pending history navigation wins over the newest
    /// entry with that id.
    pub(crate) fn reported_entry_index(
        &self,
        site: SiteInstanceId,
        page_id: i32,
    ) -> Option<usize> {
        if let Some(pending) = self.pending_index() {
            let entry = &self.entries[pending];
            if entry.site_instance == Some(site) && entry.page_id == page_id {
                return Some(pending);
            }
        }
        self.index_of_entry_with_page_id(Some(site), page_id)
    }

    pub fn entry_with_page_id(
        &self,
        site: Option<SiteInstanceId>,
        page_id: i32,
    ) -> Option<&NavigationEntry> {
        self.index_of_entry_with_page_id(site, page_id)
            .map(|i| &self.entries[i])
    }

    /// Whether navigating to `url` would only change the committed page's
    /// fragment.
    pub fn is_url_in_page_navigation(&self, url: &Url) -> bool {
        self.last_committed_entry()
            .is_some_and(|e| crate::classify::are_urls_in_page_navigation(&e.url, url))
    }

    // -------------------------------------------------------------------
    // Handles
    // -------------------------------------------------------------------

    /// A handle to the entry at `index`, valid until the next structural
    /// change of the list.
    pub fn handle_for(&self, index: usize) -> Option<EntryHandle> {
        (index < self.entries.len()).then_some(EntryHandle {
            index,
            generation: self.generation,
        })
    }

    /// The entry a handle refers to, or `None` if the list changed since.
    pub fn resolve(&self, handle: EntryHandle) -> Option<&NavigationEntry> {
        if handle.generation != self.generation {
            return None;
        }
        self.entries.get(handle.index)
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation += 1;
    }

    // -------------------------------------------------------------------
    // Back / forward
    // -------------------------------------------------------------------

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1 && self.current_entry_index().is_some_and(|i| i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_entry_index()
            .is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn can_go_to_offset(&self, offset: isize) -> bool {
        self.offset_index(offset).is_some()
    }

    fn offset_index(&self, offset: isize) -> Option<usize> {
        let base = self
            .transient_index
            .or(self.last_committed_index)
            .map_or(-1, |i| i as isize);
        let index = base.checked_add(offset)?;
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.entries.len())
    }

    /// Navigate one entry back.
    ///
    /// # Panics
    ///
    /// Panics if [`can_go_back`](Self::can_go_back) is false.
    pub fn go_back(&mut self) {
        assert!(self.can_go_back(), "go_back called with nothing to go back to");
        let Some(current) = self.current_entry_index() else {
            return;
        };
        // The transient entry sits after the committed one, so removing it
        // does not move `current - 1`.
        self.discard_non_committed_entries();
        self.start_history_navigation(current - 1);
    }

    /// Navigate one entry forward.
    ///
    /// # Panics
    ///
    /// Panics if [`can_go_forward`](Self::can_go_forward) is false.
    pub fn go_forward(&mut self) {
        assert!(
            self.can_go_forward(),
            "go_forward called with nothing to go forward to"
        );
        let Some(current) = self.current_entry_index() else {
            return;
        };
        let had_transient = self.transient_index.is_some();
        self.discard_non_committed_entries();
        // Removing the transient entry slid the next entry into its slot.
        let target = if had_transient { current } else { current + 1 };
        self.start_history_navigation(target);
    }

    /// Navigate to the entry at `index`.
    ///
    /// Navigating to a shown transient entry does nothing; indices after it
    /// are shifted down by one because it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if `index >= entry_count()`.
    pub fn go_to_index(&mut self, index: usize) {
        assert!(
            index < self.entries.len(),
            "go_to_index({index}) out of range (entry count {})",
            self.entries.len()
        );
        let mut index = index;
        if let Some(transient) = self.transient_index {
            if index == transient {
                return;
            }
            if index > transient {
                index -= 1;
            }
        }
        self.discard_non_committed_entries();
        self.start_history_navigation(index);
    }

    /// Navigate `offset` entries away from the current one.
    ///
    /// # Panics
    ///
    /// Panics if the target is outside the list; check with
    /// [`can_go_to_offset`](Self::can_go_to_offset).
    pub fn go_to_offset(&mut self, offset: isize) {
        let Some(index) = self.offset_index(offset) else {
            panic!("go_to_offset({offset}) out of range");
        };
        self.go_to_index(index);
    }

    fn start_history_navigation(&mut self, index: usize) {
        let entry = &mut self.entries[index];
        entry.transition = entry.transition.with_qualifier(PageTransition::FORWARD_BACK);
        log::debug!("History navigation to index {index} ({})", entry.url);
        self.pending = Pending::Existing(index);
        self.navigate_to_pending_entry(false);
    }

    // -------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------

    /// Build a fresh, uncommitted entry for a load.
    pub fn create_navigation_entry(
        url: Url,
        referrer: Option<Url>,
        transition: PageTransition,
    ) -> NavigationEntry {
        let mut entry = NavigationEntry::new(url.clone(), referrer, transition);
        entry.user_typed_url = Some(url);
        entry
    }

    /// Start a fresh load of `url`, replacing any pending or transient entry.
    pub fn load_url(&mut self, url: Url, referrer: Option<Url>, transition: PageTransition) {
        self.needs_reload = false;
        let entry = Self::create_navigation_entry(url, referrer, transition);
        self.load_entry(entry);
    }

    /// Parse `url` and load it.
    ///
    /// Empty or unparseable input is rejected without touching any state.
    pub fn load_url_str(
        &mut self,
        url: &str,
        referrer: Option<Url>,
        transition: PageTransition,
    ) -> Result<()> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(TabnavError::InvalidUrl(url.to_string()));
        }
        let parsed =
            Url::parse(trimmed).map_err(|e| TabnavError::InvalidUrl(format!("{trimmed}: {e}")))?;
        self.load_url(parsed, referrer, transition);
        Ok(())
    }

    /// Make `entry` the pending entry and ask the host to load it.
    pub fn load_entry(&mut self, entry: NavigationEntry) {
        // A new load may never commit (downloads, 204s), so the current
        // entry stays committed; only uncommitted state is dropped.
        self.discard_non_committed_entries_internal();
        log::debug!("Loading {} ({})", entry.url, entry.transition);
        self.pending = Pending::New(Box::new(entry));
        self.notify(NavigationEvent::EntryPending);
        self.navigate_to_pending_entry(false);
    }

    /// Reload the current entry.
    ///
    /// Entries with POST data go to the repost confirmation collaborator
    /// first when `check_for_repost` is set (and enabled in the config);
    /// it calls back with `reload(false)` once the user agrees. Reloading
    /// while a transient entry is shown, or with nothing loaded, does
    /// nothing.
    pub fn reload(&mut self, check_for_repost: bool) {
        if self.transient_index.is_some() {
            return;
        }
        self.discard_non_committed_entries_internal();
        let Some(current) = self.current_entry_index() else {
            return;
        };
        if self.check_for_repost && check_for_repost && self.entries[current].has_post_data {
            log::info!("Reload of POST entry {current} needs confirmation");
            self.host.repost.confirm_repost(current);
            return;
        }
        self.entries[current].transition = PageTransition::RELOAD;
        self.pending = Pending::Existing(current);
        self.navigate_to_pending_entry(true);
    }

    /// Issue the first load of a restored history.
    pub fn load_if_necessary(&mut self) {
        if !self.needs_reload {
            return;
        }
        self.needs_reload = false;
        let Some(index) = self.last_committed_index else {
            return;
        };
        self.pending = Pending::Existing(index);
        self.navigate_to_pending_entry(false);
    }

    pub(crate) fn navigate_to_pending_entry(&mut self, reload: bool) {
        let entry = match &self.pending {
            Pending::None => return,
            Pending::New(entry) => &**entry,
            Pending::Existing(index) => &self.entries[*index],
        };
        if !self.host.requests.navigate_to_pending_entry(entry, reload) {
            log::warn!("Host could not start navigation to {}", entry.url);
            self.discard_non_committed_entries();
        }
    }

    // -------------------------------------------------------------------
    // Entry list edits
    // -------------------------------------------------------------------

    /// Remove the entry at `index`.
    ///
    /// Pending and transient state is discarded first. Removing the
    /// committed entry loads the entry that slides into its place (or the
    /// new last entry); removing the only entry loads `default_url`, falling
    /// back to the configured default page.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range once non-committed entries are gone.
    pub fn remove_entry_at_index(&mut self, index: usize, default_url: Option<Url>) {
        self.discard_non_committed_entries();
        assert!(
            index < self.entries.len(),
            "remove_entry_at_index({index}) out of range (entry count {})",
            self.entries.len()
        );
        self.entries.remove(index);
        self.bump_generation();

        match self.last_committed_index {
            Some(committed) if committed == index => {
                if self.entries.is_empty() {
                    self.last_committed_index = None;
                    let url = default_url.unwrap_or_else(|| self.default_url.clone());
                    self.load_url(url, None, PageTransition::START_PAGE);
                } else {
                    let next = index.min(self.entries.len() - 1);
                    self.last_committed_index = Some(next);
                    self.pending = Pending::Existing(next);
                    self.navigate_to_pending_entry(false);
                }
            }
            Some(committed) if committed > index => {
                self.last_committed_index = Some(committed - 1);
            }
            _ => {}
        }
    }

    /// Show `entry` (an interstitial, say) right after the committed entry.
    ///
    /// Replaces any transient entry already shown; it is never committed
    /// and goes away with the next navigation.
    pub fn add_transient_entry(&mut self, entry: NavigationEntry) {
        self.discard_transient_entry();
        let index = self.last_committed_index.map_or(0, |i| i + 1);
        self.entries.insert(index, entry);
        self.bump_generation();
        if let Pending::Existing(pending) = &mut self.pending {
            if *pending >= index {
                *pending += 1;
            }
        }
        self.transient_index = Some(index);
        self.notify(NavigationEvent::StateInvalidated);
    }

    /// Apply `edit` to the entry at `index` and tell observers it changed.
    ///
    /// For presentation updates (title, favicon, SSL state) that arrive
    /// after the commit.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update_entry(&mut self, index: usize, edit: impl FnOnce(&mut NavigationEntry)) {
        let len = self.entries.len();
        let Some(entry) = self.entries.get_mut(index) else {
            panic!("update_entry({index}) out of range (entry count {len})");
        };
        edit(entry);
        self.notify(NavigationEvent::EntryChanged { index });
    }

    // -------------------------------------------------------------------
    // Discarding
    // -------------------------------------------------------------------

    /// Drop the pending entry and any transient entry.
    pub fn discard_non_committed_entries(&mut self) {
        let had_transient = self.transient_index.is_some();
        self.discard_non_committed_entries_internal();
        if had_transient {
            self.notify(NavigationEvent::StateInvalidated);
        }
    }

    pub(crate) fn discard_non_committed_entries_internal(&mut self) {
        self.pending = Pending::None;
        self.discard_transient_entry();
    }

    pub(crate) fn discard_transient_entry(&mut self) {
        let Some(transient) = self.transient_index.take() else {
            return;
        };
        self.entries.remove(transient);
        self.bump_generation();
        if let Pending::Existing(pending) = &mut self.pending {
            if *pending > transient {
                *pending -= 1;
            }
        }
    }

    // -------------------------------------------------------------------
    // Committing
    // -------------------------------------------------------------------

    /// Append a committed entry after truncating forward history and
    /// evicting the oldest entry when full.
    ///
    /// The pending entry's unique id carries over to the committed entry.
    pub(crate) fn insert_entry(&mut self, mut entry: NavigationEntry) {
        debug_assert!(!entry.transition.core_eq(PageTransition::AUTO_SUBFRAME));

        if let Some(pending) = self.pending_entry() {
            entry.unique_id = pending.unique_id;
        }
        self.discard_non_committed_entries_internal();

        let keep = self.last_committed_index.map_or(0, |i| i + 1);
        if self.entries.len() > keep {
            let count = self.entries.len() - keep;
            self.entries.truncate(keep);
            self.bump_generation();
            log::debug!("Pruned {count} forward entries");
            self.notify(NavigationEvent::EntriesPruned(PrunedDetails {
                from_front: false,
                count,
            }));
        }

        if self.entries.len() >= self.max_entry_count {
            self.entries.remove(0);
            self.last_committed_index = self.last_committed_index.and_then(|i| i.checked_sub(1));
            self.bump_generation();
            log::debug!("Evicted oldest entry (cap {})", self.max_entry_count);
            self.notify(NavigationEvent::EntriesPruned(PrunedDetails {
                from_front: true,
                count: 1,
            }));
        }

        let site = entry.site_instance;
        let page_id = entry.page_id;
        self.entries.push(entry);
        self.bump_generation();
        self.last_committed_index = Some(self.entries.len() - 1);
        self.update_max_page_id(site, page_id);
    }
}
