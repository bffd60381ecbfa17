//! Turning commit reports into entry-list changes.

use tabnav_types::{NavigationGesture, PageTransition};

use crate::classify::{NavigationType, are_urls_in_page_navigation, classify_navigation};
use crate::entry::{NavigationEntry, PageType, SslStatus};
use crate::events::{EntryHandle, LoadCommittedDetails, NavigationEvent};
use crate::history::{NavigationHistory, Pending};
use crate::host::{CommitReportSource, FrameNavigateParams};

impl NavigationHistory {
    /// Apply a renderer commit report.
    ///
    /// Returns `true` when the report committed something observers should
    /// hear about; an `EntryCommitted` event has then been published.
    /// Ignored reports and automatic subframe loads that do not move the
    /// committed index return `false` and leave the history untouched.
    pub fn renderer_did_navigate(&mut self, params: &FrameNavigateParams) -> bool {
        let previous_index = self.last_committed_index;
        let previous_url = self.last_committed_entry().map(|e| e.url.clone());

        // Restored entries learn their renderer group on first load.
        if let Pending::Existing(index) = self.pending {
            let entry = &mut self.entries[index];
            entry.site_instance = Some(params.site_instance);
            let page_id = entry.page_id;
            self.update_max_page_id(Some(params.site_instance), page_id);
        }

        let nav_type = classify_navigation(self, params);
        log::debug!(
            "Commit report page_id={} url={} classified as {nav_type}",
            params.page_id,
            params.url
        );

        match nav_type {
            NavigationType::NewPage => self.did_navigate_to_new_page(params),
            NavigationType::ExistingPage => self.did_navigate_to_existing_page(params),
            NavigationType::SamePage => self.did_navigate_to_same_page(params),
            NavigationType::InPage => self.did_navigate_in_page(params),
            NavigationType::NewSubframe => self.did_navigate_new_subframe(params),
            NavigationType::AutoSubframe => {
                if !self.did_navigate_auto_subframe(params) {
                    return false;
                }
            }
            NavigationType::NavIgnore => return false,
        }

        let Some(committed) = self.last_committed_index else {
            unreachable!("every committing navigation type leaves a committed entry");
        };
        let entry = &mut self.entries[committed];
        if !params.content_state.is_empty() {
            entry.content_state.clone_from(&params.content_state);
        }
        entry.ensure_content_state();

        let is_auto = (params.transition.is_redirect() && self.pending_entry().is_none())
            || params.gesture == NavigationGesture::Auto;
        let is_in_page = previous_url
            .as_ref()
            .is_some_and(|previous| are_urls_in_page_navigation(previous, &params.url));

        log::info!("Committed {nav_type} {} at index {committed}", params.url);
        let details = LoadCommittedDetails {
            nav_type,
            previous_index,
            previous_url,
            entry: self.committed_handle(committed),
            url: params.url.clone(),
            is_auto,
            is_in_page,
            is_main_frame: params.transition.is_main_frame(),
            did_replace_entry: false,
            security_info: params.security_info.clone(),
            http_status_code: params.http_status_code,
        };
        self.notify(NavigationEvent::EntryCommitted(details));
        true
    }

    /// Feed every queued report to
    /// [`renderer_did_navigate`](Self::renderer_did_navigate).
    ///
    /// Returns how many of them committed.
    pub fn pump_reports(&mut self, source: &mut dyn CommitReportSource) -> usize {
        let mut committed = 0;
        while let Some(params) = source.next_report() {
            if self.renderer_did_navigate(&params) {
                committed += 1;
            }
        }
        committed
    }

    /// Commit the pending entry without a renderer.
    ///
    /// Hosts with no renderer process (tests, headless drivers) use this in
    /// place of a commit report. A fresh entry gets the next page id of its
    /// renderer group (or of the tab when it has none) and is appended; an
    /// existing entry simply becomes the committed one.
    pub fn commit_pending_entry(&mut self) {
        self.discard_transient_entry();

        let previous_index = self.last_committed_index;
        let previous_url = self.last_committed_entry().map(|e| e.url.clone());

        let nav_type = match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::None => return,
            Pending::Existing(index) => {
                self.last_committed_index = Some(index);
                NavigationType::ExistingPage
            }
            Pending::New(entry) => {
                let mut entry = *entry;
                let max = match entry.site_instance {
                    Some(site) => self.max_page_id(site),
                    None => self.tab_max_page_id,
                };
                entry.page_id = max + 1;
                self.insert_entry(entry);
                NavigationType::NewPage
            }
        };

        let Some(committed) = self.last_committed_index else {
            return;
        };
        let entry = &mut self.entries[committed];
        entry.ensure_content_state();
        let url = entry.url.clone();

        log::info!("Committed pending {nav_type} {url} at index {committed}");
        let details = LoadCommittedDetails {
            nav_type,
            previous_index,
            previous_url,
            entry: self.committed_handle(committed),
            url,
            is_auto: false,
            is_in_page: false,
            is_main_frame: true,
            did_replace_entry: false,
            security_info: Vec::new(),
            http_status_code: 0,
        };
        self.notify(NavigationEvent::EntryCommitted(details));
    }

    fn committed_handle(&self, index: usize) -> EntryHandle {
        EntryHandle {
            index,
            generation: self.generation,
        }
    }

    /// Index of the entry a report names. Classification already proved it
    /// exists.
    fn reported_index(&self, params: &FrameNavigateParams) -> usize {
        let Some(index) = self.reported_entry_index(params.site_instance, params.page_id) else {
            panic!(
                "no entry with page id {} in {} after classification",
                params.page_id, params.site_instance
            );
        };
        index
    }

    // -------------------------------------------------------------------
    // Per-type handlers
    // -------------------------------------------------------------------

    fn did_navigate_to_new_page(&mut self, params: &FrameNavigateParams) {
        let mut entry = match self.pending_entry() {
            Some(pending) => pending.clone(),
            None => NavigationEntry::new(
                params.url.clone(),
                params.referrer.clone(),
                params.transition,
            ),
        };
        entry.page_type = PageType::Normal;
        entry.url = params.url.clone();
        entry.referrer = params.referrer.clone();
        entry.page_id = params.page_id;
        entry.transition = params.transition;
        entry.site_instance = Some(params.site_instance);
        entry.has_post_data = params.is_post;
        entry.content_state.clear();
        entry.ssl = SslStatus::default();

        self.insert_entry(entry);
    }

    fn did_navigate_to_existing_page(&mut self, params: &FrameNavigateParams) {
        // Drop the transient first; it may sit before the reported entry.
        self.discard_transient_entry();
        let index = self.reported_index(params);

        let entry = &mut self.entries[index];
        entry.url = params.url.clone();
        entry.site_instance = Some(params.site_instance);

        // A different pending entry means another navigation is still in
        // flight; it stays pending.
        if self.pending_index() == Some(index) {
            self.discard_non_committed_entries_internal();
        }
        self.last_committed_index = Some(index);
    }

    /// The committed index stays where it is, even if the
    /// matched entry is not the committed one.
    fn did_navigate_to_same_page(&mut self, params: &FrameNavigateParams) {
        let index = self.reported_index(params);
        let Some(unique_id) = self.pending_new_entry().map(|e| e.unique_id) else {
            return;
        };
        self.entries[index].unique_id = unique_id;
        self.discard_non_committed_entries();
    }

    /// Append a copy of the reported entry carrying the fragment URL, as if
    /// it were a new page. It keeps the page id, so going back returns to
    /// the page without the fragment.
    fn did_navigate_in_page(&mut self, params: &FrameNavigateParams) {
        let index = self.reported_index(params);
        let mut entry = self.entries[index].clone_with_new_unique_id();
        entry.url = params.url.clone();
        entry.page_id = params.page_id;
        entry.site_instance = Some(params.site_instance);
        entry.transition = params.transition;
        self.insert_entry(entry);
    }

    fn did_navigate_new_subframe(&mut self, params: &FrameNavigateParams) {
        let Some(last) = self.last_committed_entry() else {
            panic!("new subframe navigation with nothing committed");
        };
        let mut entry = last.clone_with_new_unique_id();
        entry.page_id = params.page_id;
        entry.site_instance = Some(params.site_instance);
        entry.transition = PageTransition::MANUAL_SUBFRAME;
        self.insert_entry(entry);
    }

    /// Returns whether the committed index moved.
    fn did_navigate_auto_subframe(&mut self, params: &FrameNavigateParams) -> bool {
        let index = self.reported_index(params);
        if self.last_committed_index == Some(index) {
            return false;
        }
        // Back/forward into a subframe navigation.
        if self.pending_index() == Some(index) {
            self.pending = Pending::None;
        }
        self.discard_transient_entry();
        let index = self.reported_index(params);
        self.last_committed_index = Some(index);
        true
    }
}
