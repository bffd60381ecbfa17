//! The back and forward drop-down menus.
//!
//! A menu lists, in order:
//!
//! ```text
//! id 1..=H          the H most recent entries on one side of the current one
//! id H+1            separator
//! id H+2..=H+1+C    C chapter stops (only when the recent window is full)
//! id H+C+2          separator (only when C > 0)
//! last id           "Show Full History"
//! ```
//!
//! A chapter stop is a landmark at the edge of a run of same-site entries,
//! found by [`BackForwardMenuModel::next_chapter_stop`]. Every query reads
//! the history afresh; the model caches nothing.

use tabnav_history::{FaviconStatus, NavigationEntry, NavigationHistory};
use tabnav_types::MenuConfig;

use crate::domain::same_domain_or_host;

/// Label of the trailing menu item.
pub const SHOW_FULL_HISTORY_LABEL: &str = "Show Full History";

const ELLIPSIS: &str = "...";

// -----------------------------------------------------------------------
// HistorySource
// -----------------------------------------------------------------------

/// The read-only view of a history the menus need.
pub trait HistorySource {
    fn entry_count(&self) -> usize;
    /// Index the menus are relative to.
    fn current_entry_index(&self) -> Option<usize>;
    fn entry_at_index(&self, index: usize) -> Option<&NavigationEntry>;
}

impl HistorySource for NavigationHistory {
    fn entry_count(&self) -> usize {
        NavigationHistory::entry_count(self)
    }

    fn current_entry_index(&self) -> Option<usize> {
        NavigationHistory::current_entry_index(self)
    }

    fn entry_at_index(&self, index: usize) -> Option<&NavigationEntry> {
        NavigationHistory::entry_at_index(self, index)
    }
}

// -----------------------------------------------------------------------
// Menu types
// -----------------------------------------------------------------------

/// Which side of the current entry a menu shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDirection {
    Backward,
    Forward,
}

impl MenuDirection {
    fn action_prefix(self) -> &'static str {
        match self {
            Self::Backward => "BackMenu_",
            Self::Forward => "ForwardMenu_",
        }
    }
}

/// What activating a menu item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    GoToIndex(usize),
    ShowFullHistory,
}

/// One row of a built menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: usize,
    pub label: String,
    pub is_separator: bool,
    pub has_icon: bool,
    pub command: Option<MenuCommand>,
}

// -----------------------------------------------------------------------
// BackForwardMenuModel
// -----------------------------------------------------------------------

/// Menu projection over a history. Menu ids are 1-based.
pub struct BackForwardMenuModel<'a, H: HistorySource + ?Sized> {
    history: &'a H,
    direction: MenuDirection,
    config: MenuConfig,
}

impl<'a, H: HistorySource + ?Sized> BackForwardMenuModel<'a, H> {
    /// A model with the stock limits (12 recent items, 5 chapter stops).
    pub fn new(history: &'a H, direction: MenuDirection) -> Self {
        Self::with_config(history, direction, MenuConfig::default())
    }

    pub fn with_config(history: &'a H, direction: MenuDirection, config: MenuConfig) -> Self {
        Self {
            history,
            direction,
            config,
        }
    }

    pub fn direction(&self) -> MenuDirection {
        self.direction
    }

    fn is_forward(&self) -> bool {
        self.direction == MenuDirection::Forward
    }

    // -------------------------------------------------------------------
    // Counts
    // -------------------------------------------------------------------

    /// Recent entries shown, at most `max_history_items`.
    pub fn history_item_count(&self) -> usize {
        let Some(current) = self.history.current_entry_index() else {
            return 0;
        };
        let available = if self.is_forward() {
            self.history.entry_count().saturating_sub(current + 1)
        } else {
            current
        };
        available.min(self.config.max_history_items)
    }

    /// Chapter stops shown after `history_items` recent entries.
    ///
    /// Only a full recent window gets chapter stops; they are collected
    /// from its far edge outwards, up to `max_chapter_stops`.
    pub fn chapter_stop_count(&self, history_items: usize) -> usize {
        if history_items != self.config.max_history_items {
            return 0;
        }
        let Some(mut from) = self.window_edge(history_items) else {
            return 0;
        };
        let forward = self.is_forward();
        let mut stops = 0;
        while stops < self.config.max_chapter_stops {
            match self.next_chapter_stop(from, forward) {
                Some(stop) => {
                    stops += 1;
                    from = stop;
                }
                None => break,
            }
        }
        stops
    }

    /// Number of menu ids, separators included. Zero for an empty menu.
    pub fn total_item_count(&self) -> usize {
        let items = self.history_item_count();
        if items == 0 {
            return 0;
        }
        let stops = self.chapter_stop_count(items);
        let mut total = items + 2;
        if stops > 0 {
            total += stops + 1;
        }
        total
    }

    // -------------------------------------------------------------------
    // Chapter stops
    // -------------------------------------------------------------------

    /// Index `offset` entries away from the current one in this menu's
    /// direction.
    fn window_edge(&self, offset: usize) -> Option<usize> {
        let current = self.history.current_entry_index()?;
        if self.is_forward() {
            current.checked_add(offset)
        } else {
            current.checked_sub(offset)
        }
    }

    /// The next chapter stop after `from` in the given direction.
    ///
    /// Going forward, the stop is the last entry of the same-site run that
    /// starts right after `from`. Going backward, it is the first entry
    /// before `from` on a different site. When the scan runs off the end of
    /// the list without a site change, the last entry in that direction is
    /// the stop. `None` when `from` is out of range or nothing lies beyond
    /// it.
    pub fn next_chapter_stop(&self, from: usize, forward: bool) -> Option<usize> {
        let count = self.history.entry_count();
        if from >= count {
            return None;
        }

        if forward {
            if from + 1 >= count {
                return None;
            }
            let start = from + 1;
            let url = &self.history.entry_at_index(start)?.url;
            for i in start + 1..count {
                let other = &self.history.entry_at_index(i)?.url;
                if !same_domain_or_host(url, other) {
                    return Some(i - 1);
                }
            }
            Some(count - 1)
        } else {
            if from == 0 {
                return None;
            }
            let url = &self.history.entry_at_index(from)?.url;
            for i in (0..from).rev() {
                let other = &self.history.entry_at_index(i)?.url;
                if !same_domain_or_host(url, other) {
                    return Some(i);
                }
            }
            Some(0)
        }
    }

    /// Start `offset` entries from the current one and step over
    /// `skip + 1` chapter stops.
    pub fn find_chapter_stop(&self, offset: usize, forward: bool, skip: usize) -> Option<usize> {
        let current = self.history.current_entry_index()?;
        let mut index = if forward {
            current.checked_add(offset)?
        } else {
            current.checked_sub(offset)?
        };
        for _ in 0..=skip {
            index = self.next_chapter_stop(index, forward)?;
        }
        Some(index)
    }

    // -------------------------------------------------------------------
    // Menu ids
    // -------------------------------------------------------------------

    /// Entry index a menu id stands for; `None` for separators, "Show Full
    /// History" and ids outside the menu.
    pub fn menu_id_to_nav_entry_index(&self, id: usize) -> Option<usize> {
        if id == 0 {
            return None;
        }
        let items = self.history_item_count();
        if id <= items {
            return self.window_edge(id);
        }
        if id == items + 1 {
            return None;
        }
        let stops = self.chapter_stop_count(items);
        if id >= items + 1 + stops + 1 {
            return None;
        }
        self.find_chapter_stop(items, self.is_forward(), id - items - 2)
    }

    pub fn is_separator(&self, id: usize) -> bool {
        if id == 0 || id > self.total_item_count() {
            return false;
        }
        let items = self.history_item_count();
        if id > items + 1 {
            let stops = self.chapter_stop_count(items);
            stops > 0 && id == items + 1 + stops + 1
        } else {
            id == items + 1
        }
    }

    pub fn is_show_full_history(&self, id: usize) -> bool {
        id != 0 && id == self.total_item_count()
    }

    pub fn item_has_command(&self, id: usize) -> bool {
        id != 0 && id <= self.total_item_count() && !self.is_separator(id)
    }

    pub fn item_has_icon(&self, id: usize) -> bool {
        id != 0 && id < self.total_item_count() && !self.is_separator(id)
    }

    pub fn navigation_entry(&self, id: usize) -> Option<&'a NavigationEntry> {
        let index = self.menu_id_to_nav_entry_index(id)?;
        self.history.entry_at_index(index)
    }

    /// Display label. Separators and unknown ids get an empty label.
    pub fn item_label(&self, id: usize) -> String {
        if self.is_show_full_history(id) {
            return SHOW_FULL_HISTORY_LABEL.to_string();
        }
        if self.is_separator(id) {
            return String::new();
        }
        self.navigation_entry(id)
            .map(|entry| elide(&entry.title_for_display(), self.config.max_label_chars))
            .unwrap_or_default()
    }

    /// The entry's favicon, when it has pixels to draw.
    pub fn item_icon(&self, id: usize) -> Option<&'a FaviconStatus> {
        if !self.item_has_icon(id) {
            return None;
        }
        self.navigation_entry(id)
            .map(|entry| &entry.favicon)
            .filter(|favicon| favicon.has_bitmap())
    }

    pub fn command_for_id(&self, id: usize) -> Option<MenuCommand> {
        if self.is_show_full_history(id) {
            return Some(MenuCommand::ShowFullHistory);
        }
        self.menu_id_to_nav_entry_index(id)
            .map(MenuCommand::GoToIndex)
    }

    /// Metrics action recorded when `id` is activated, e.g.
    /// `BackMenu_HistoryItem3` or `ForwardMenu_ChapterStop1`.
    pub fn action_name(&self, id: usize) -> Option<String> {
        if !self.item_has_command(id) {
            return None;
        }
        let prefix = self.direction.action_prefix();
        if self.is_show_full_history(id) {
            return Some(format!("{prefix}ShowFullHistory"));
        }
        let items = self.history_item_count();
        if id <= items {
            Some(format!("{prefix}HistoryItem{id}"))
        } else {
            Some(format!("{prefix}ChapterStop{}", id - items - 1))
        }
    }

    /// Every row of the menu, in id order.
    pub fn items(&self) -> Vec<MenuItem> {
        let history_items = self.history_item_count();
        log::trace!(
            "{:?} menu: {history_items} history item(s), {} chapter stop(s)",
            self.direction,
            self.chapter_stop_count(history_items)
        );
        (1..=self.total_item_count())
            .map(|id| MenuItem {
                id,
                label: self.item_label(id),
                is_separator: self.is_separator(id),
                has_icon: self.item_has_icon(id),
                command: self.command_for_id(id),
            })
            .collect()
    }
}

/// Shorten `text` to at most `max_chars` characters, ending in `...`.
fn elide(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnav_history::NavigationHost;
    use tabnav_types::{HistoryConfig, PageTransition};
    use url::Url;

    /// A plain list standing in for a history.
    struct ListHistory {
        entries: Vec<NavigationEntry>,
        current: Option<usize>,
    }

    impl ListHistory {
        fn new(urls: &[&str], current: usize) -> Self {
            let entries = urls
                .iter()
                .enumerate()
                .map(|(i, u)| {
                    let mut e =
                        NavigationEntry::new(Url::parse(u).unwrap(), None, PageTransition::LINK);
                    e.title = format!("title {i}");
                    e
                })
                .collect();
            Self {
                entries,
                current: Some(current),
            }
        }

        /// `runs` consecutive groups of `per_run` entries, one site per group.
        fn runs(runs: usize, per_run: usize, current: usize) -> Self {
            let urls: Vec<String> = (0..runs * per_run)
                .map(|i| format!("http://www.d{}.com/{i}", i / per_run))
                .collect();
            let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
            Self::new(&refs, current)
        }
    }

    impl HistorySource for ListHistory {
        fn entry_count(&self) -> usize {
            self.entries.len()
        }
        fn current_entry_index(&self) -> Option<usize> {
            self.current
        }
        fn entry_at_index(&self, index: usize) -> Option<&NavigationEntry> {
            self.entries.get(index)
        }
    }

    fn loaded_history(urls: &[&str]) -> NavigationHistory {
        let mut h =
            NavigationHistory::new(NavigationHost::detached(), &HistoryConfig::default()).unwrap();
        for (i, u) in urls.iter().enumerate() {
            h.load_url(Url::parse(u).unwrap(), None, PageTransition::LINK);
            h.commit_pending_entry();
            h.update_entry(i, |e| e.title = format!("Page {}", i + 1));
        }
        h
    }

    #[test]
    fn basic_case_eight_pages() {
        let h = loaded_history(&[
            "http://a.com/1",
            "http://a.com/2",
            "http://a.com/3",
            "http://b.com/1",
            "http://b.com/2",
            "http://c.com/1",
            "http://c.com/2",
            "http://c.com/3",
        ]);
        let back = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        let forward = BackForwardMenuModel::new(&h, MenuDirection::Forward);

        assert_eq!(back.history_item_count(), 7);
        assert_eq!(back.chapter_stop_count(7), 0);
        assert_eq!(back.total_item_count(), 9);
        assert_eq!(forward.total_item_count(), 0);

        assert_eq!(back.item_label(1), "Page 7");
        assert_eq!(back.item_label(7), "Page 1");
        assert!(back.is_separator(8));
        assert_eq!(back.item_label(8), "");
        assert!(back.is_show_full_history(9));
        assert_eq!(back.item_label(9), SHOW_FULL_HISTORY_LABEL);
        assert!(!back.is_separator(9));

        assert_eq!(back.menu_id_to_nav_entry_index(1), Some(6));
        assert_eq!(back.menu_id_to_nav_entry_index(7), Some(0));
        assert_eq!(back.menu_id_to_nav_entry_index(8), None);
        assert_eq!(back.menu_id_to_nav_entry_index(9), None);
        assert_eq!(back.command_for_id(3), Some(MenuCommand::GoToIndex(4)));
        assert_eq!(back.command_for_id(9), Some(MenuCommand::ShowFullHistory));
        assert_eq!(back.command_for_id(8), None);
    }

    #[test]
    fn forward_menu_after_going_back() {
        let mut h = loaded_history(&[
            "http://a.com/1",
            "http://a.com/2",
            "http://b.com/1",
            "http://b.com/2",
            "http://c.com/1",
        ]);
        h.go_to_index(0);
        h.commit_pending_entry();

        let forward = BackForwardMenuModel::new(&h, MenuDirection::Forward);
        assert_eq!(forward.history_item_count(), 4);
        assert_eq!(forward.total_item_count(), 6);
        assert_eq!(forward.menu_id_to_nav_entry_index(1), Some(1));
        assert_eq!(forward.menu_id_to_nav_entry_index(4), Some(4));
        assert!(forward.is_separator(5));
        assert!(forward.is_show_full_history(6));

        let back = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        assert_eq!(back.total_item_count(), 0);
        assert!(back.items().is_empty());
    }

    #[test]
    fn pending_back_navigation_moves_the_menus() {
        let mut h = loaded_history(&["http://a.com/1", "http://a.com/2", "http://a.com/3"]);
        h.go_back();
        let back = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        let forward = BackForwardMenuModel::new(&h, MenuDirection::Forward);
        assert_eq!(back.history_item_count(), 1);
        assert_eq!(forward.history_item_count(), 1);
    }

    #[test]
    fn max_items_with_chapter_stops() {
        // Eight sites, four entries each, current = 31.
        let h = ListHistory::runs(8, 4, 31);
        let back = BackForwardMenuModel::new(&h, MenuDirection::Backward);

        assert_eq!(back.history_item_count(), 12);
        assert_eq!(back.chapter_stop_count(12), 5);
        assert_eq!(back.total_item_count(), 12 + 2 + 5 + 1);

        assert_eq!(back.menu_id_to_nav_entry_index(12), Some(19));
        assert!(back.is_separator(13));
        let stops: Vec<_> = (14..=18)
            .map(|id| back.menu_id_to_nav_entry_index(id))
            .collect();
        assert_eq!(stops, vec![Some(15), Some(11), Some(7), Some(3), Some(0)]);
        assert!(back.is_separator(19));
        assert!(back.is_show_full_history(20));

        assert!(back.item_has_command(20));
        assert!(!back.item_has_command(21));
        assert!(!back.item_has_command(13));
        assert!(!back.item_has_icon(20));
        assert!(back.item_has_icon(14));
    }

    #[test]
    fn thirty_two_pages_of_one_site() {
        let urls: Vec<String> = (0..32).map(|i| format!("http://www.a.com/{i}")).collect();
        let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let h = loaded_history(&refs);
        let back = BackForwardMenuModel::new(&h, MenuDirection::Backward);

        // A single run: the only stop is the first entry.
        assert_eq!(back.chapter_stop_count(12), 1);
        let offset = 1 + 1;
        assert_eq!(back.total_item_count(), 12 + 2 + offset);
        assert_eq!(back.menu_id_to_nav_entry_index(14), Some(0));
        assert!(!back.item_has_command(12 + offset + 3));
    }

    #[test]
    fn forward_chapter_stops() {
        // Five sites of four entries, current = 0.
        let h = ListHistory::runs(5, 4, 0);
        let forward = BackForwardMenuModel::new(&h, MenuDirection::Forward);

        assert_eq!(forward.history_item_count(), 12);
        assert_eq!(forward.chapter_stop_count(12), 2);
        assert_eq!(forward.total_item_count(), 17);
        assert_eq!(forward.menu_id_to_nav_entry_index(14), Some(15));
        assert_eq!(forward.menu_id_to_nav_entry_index(15), Some(19));
        assert!(forward.is_separator(16));
        assert!(forward.is_show_full_history(17));

        assert_eq!(
            forward.action_name(14).as_deref(),
            Some("ForwardMenu_ChapterStop1")
        );
        assert_eq!(
            forward.action_name(3).as_deref(),
            Some("ForwardMenu_HistoryItem3")
        );
        assert_eq!(
            forward.action_name(17).as_deref(),
            Some("ForwardMenu_ShowFullHistory")
        );
        assert_eq!(forward.action_name(13), None);
    }

    #[test]
    fn chapter_stops_follow_site_runs() {
        let h = ListHistory::new(
            &[
                "http://www.a.com/1",
                "http://mail.a.com/2",
                "http://www.b.com/1",
                "http://mail.b.com/2",
                "http://new.site.com",
            ],
            4,
        );
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);

        assert_eq!(m.next_chapter_stop(0, true), Some(1));
        assert_eq!(m.next_chapter_stop(1, true), Some(3));
        assert_eq!(m.next_chapter_stop(2, true), Some(3));
        assert_eq!(m.next_chapter_stop(3, true), Some(4));

        assert_eq!(m.next_chapter_stop(4, false), Some(3));
        assert_eq!(m.next_chapter_stop(3, false), Some(1));
        assert_eq!(m.next_chapter_stop(2, false), Some(1));
        // No site change before index 1: the first entry is the stop.
        assert_eq!(m.next_chapter_stop(1, false), Some(0));
    }

    #[test]
    fn chapter_stops_at_the_ends() {
        let h = ListHistory::new(&["http://a.com/", "http://b.com/", "http://c.com/"], 1);
        let m = BackForwardMenuModel::new(&h, MenuDirection::Forward);
        assert_eq!(m.next_chapter_stop(2, true), None);
        assert_eq!(m.next_chapter_stop(0, false), None);
        assert_eq!(m.next_chapter_stop(3, true), None);
        assert_eq!(m.next_chapter_stop(99, false), None);
    }

    #[test]
    fn find_chapter_stop_skips() {
        let h = ListHistory::runs(4, 3, 11);
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        // From index 11: stops at 8, 5, 2, then the first entry.
        assert_eq!(m.find_chapter_stop(0, false, 0), Some(8));
        assert_eq!(m.find_chapter_stop(0, false, 1), Some(5));
        assert_eq!(m.find_chapter_stop(0, false, 3), Some(0));
        assert_eq!(m.find_chapter_stop(0, false, 4), None);
        assert_eq!(m.find_chapter_stop(12, false, 0), None);
    }

    #[test]
    fn empty_history_has_empty_menus() {
        let h = ListHistory {
            entries: Vec::new(),
            current: None,
        };
        for dir in [MenuDirection::Backward, MenuDirection::Forward] {
            let m = BackForwardMenuModel::new(&h, dir);
            assert_eq!(m.total_item_count(), 0);
            assert!(!m.is_separator(1));
            assert!(!m.item_has_command(1));
            assert_eq!(m.menu_id_to_nav_entry_index(1), None);
            assert_eq!(m.item_label(1), "");
        }
    }

    #[test]
    fn id_zero_is_never_an_item() {
        let h = ListHistory::runs(1, 3, 2);
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        assert_eq!(m.menu_id_to_nav_entry_index(0), None);
        assert!(!m.is_separator(0));
        assert!(!m.item_has_command(0));
        assert!(!m.is_show_full_history(0));
        assert_eq!(m.action_name(0), None);
    }

    #[test]
    fn long_titles_are_elided() {
        let mut h = ListHistory::new(&["http://a.com/1", "http://a.com/2"], 1);
        h.entries[0].title = "x".repeat(1000);
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        let label = m.item_label(1);
        assert_eq!(label.chars().count(), 700);
        assert!(label.ends_with("..."));

        let config = MenuConfig {
            max_label_chars: 10,
            ..MenuConfig::default()
        };
        let m = BackForwardMenuModel::with_config(&h, MenuDirection::Backward, config);
        assert_eq!(m.item_label(1), "xxxxxxx...");
    }

    #[test]
    fn elide_respects_char_boundaries() {
        assert_eq!(elide("héllo wörld", 8), "héllo...");
        assert_eq!(elide("short", 8), "short");
    }

    #[test]
    fn untitled_entries_fall_back_to_url() {
        let mut h = ListHistory::new(&["http://a.com/1", "http://a.com/2"], 1);
        h.entries[0].title.clear();
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        assert_eq!(m.item_label(1), "http://a.com/1");
    }

    #[test]
    fn icons_only_when_bitmap_loaded() {
        let mut h = ListHistory::new(&["http://a.com/1", "http://a.com/2", "http://a.com/3"], 2);
        h.entries[1].favicon.bitmap = vec![1, 2, 3, 4];
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        assert!(m.item_icon(1).is_some());
        assert!(m.item_icon(2).is_none());
        assert!(m.item_icon(4).is_none());
    }

    #[test]
    fn items_builds_whole_menu() {
        let h = ListHistory::runs(1, 4, 3);
        let m = BackForwardMenuModel::new(&h, MenuDirection::Backward);
        let items = m.items();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].label, "title 2");
        assert_eq!(items[0].command, Some(MenuCommand::GoToIndex(2)));
        assert!(items[0].has_icon);
        assert!(items[3].is_separator);
        assert_eq!(items[3].command, None);
        assert_eq!(items[4].command, Some(MenuCommand::ShowFullHistory));
        assert_eq!(m.action_name(2).as_deref(), Some("BackMenu_HistoryItem2"));
        assert_eq!(m.action_name(5).as_deref(), Some("BackMenu_ShowFullHistory"));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_id_is_consistent(
                sites in proptest::collection::vec(0u8..4, 1..40),
                current_seed in 0usize..40,
                forward in any::<bool>(),
            ) {
                let urls: Vec<String> = sites
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("http://www.s{s}.com/{i}"))
                    .collect();
                let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
                let current = current_seed % refs.len();
                let h = ListHistory::new(&refs, current);
                let dir = if forward { MenuDirection::Forward } else { MenuDirection::Backward };
                let m = BackForwardMenuModel::new(&h, dir);

                let total = m.total_item_count();
                let separators = (1..=total).filter(|&id| m.is_separator(id)).count();
                prop_assert!(total == 0 || (1..=2).contains(&separators));

                for id in 1..=total {
                    prop_assert_eq!(m.item_has_command(id), !m.is_separator(id));
                    let index = m.menu_id_to_nav_entry_index(id);
                    if m.is_separator(id) || m.is_show_full_history(id) {
                        prop_assert!(index.is_none());
                    } else {
                        let index = index.unwrap();
                        prop_assert!(index < refs.len());
                        if forward {
                            prop_assert!(index > current);
                        } else {
                            prop_assert!(index < current);
                        }
                    }
                }
                prop_assert!(!m.item_has_command(total + 1));
            }
        }
    }
}
