//! Classification of renderer commit reports.
//!
//! Every report is mapped to exactly one [`NavigationType`] by comparing
//! its page id and URL with the history's entry list. The order of the
//! checks below is significant:
//!
//! 1. page id `-1` is ignored (and only legal before anything is active);
//! 2. a page id above the maximum seen is new (main frame) or a new
//!    subframe (if something is committed to host it);
//! 3. otherwise the page id names an existing entry, and a pending fresh
//!    load of the very same URL means the renderer turned the load into a
//!    reload (same page);
//! 4. subframe reports for existing ids are automatic subframe loads;
//! 5. a fragment-only change of the existing entry is in-page;
//! 6. everything else is back/forward/reload to an existing page.

use std::fmt;

use tabnav_types::INVALID_PAGE_ID;
use url::Url;

use crate::history::NavigationHistory;
use crate::host::FrameNavigateParams;

/// What a commit report means for the entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationType {
    /// A brand new main-frame page; appended after truncating forward history.
    NewPage,
    /// Back, forward or reload of a committed page.
    ExistingPage,
    /// A fresh load of the current URL that the renderer treated as a reload.
    SamePage,
    /// Fragment navigation within the committed page.
    InPage,
    /// A user-visible subframe navigation; gets its own history entry.
    NewSubframe,
    /// A subframe loading as part of its parent, or a session-history replay
    /// of an earlier subframe navigation.
    AutoSubframe,
    /// Nothing to record.
    NavIgnore,
}

impl fmt::Display for NavigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewPage => "new_page",
            Self::ExistingPage => "existing_page",
            Self::SamePage => "same_page",
            Self::InPage => "in_page",
            Self::NewSubframe => "new_subframe",
            Self::AutoSubframe => "auto_subframe",
            Self::NavIgnore => "nav_ignore",
        };
        f.write_str(name)
    }
}

/// Whether going from `existing` to `new` only changes the fragment.
///
/// The new URL must carry a fragment; dropping one is a real navigation.
pub fn are_urls_in_page_navigation(existing: &Url, new: &Url) -> bool {
    if new.fragment().is_none() {
        return false;
    }
    without_fragment(existing) == without_fragment(new)
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Map a commit report to a navigation type.
///
/// # Panics
///
/// Panics on reports that can only come from a broken host integration:
/// a page id of `-1` while an entry is active, or a subframe report for an
/// existing page when nothing is committed.
pub fn classify_navigation(
    history: &NavigationHistory,
    params: &FrameNavigateParams,
) -> NavigationType {
    if params.page_id == INVALID_PAGE_ID {
        // Popups navigated to about:blank and then written by script report
        // invalid ids; there is no entry they could belong to.
        assert!(
            history.active_entry().is_none(),
            "commit report with page id -1 while an entry is active"
        );
        return NavigationType::NavIgnore;
    }

    let is_main_frame = params.transition.is_main_frame();

    if params.page_id > history.max_page_id(params.site_instance) {
        if is_main_frame {
            return NavigationType::NewPage;
        }
        // A subframe written into an uncommitted popup has no page to live in.
        if history.last_committed_entry().is_none() {
            return NavigationType::NavIgnore;
        }
        return NavigationType::NewSubframe;
    }

    let Some(existing_index) = history.reported_entry_index(params.site_instance, params.page_id)
    else {
        log::warn!(
            "Commit report for unknown page id {} in {}; ignoring",
            params.page_id,
            params.site_instance
        );
        return NavigationType::NavIgnore;
    };
    let existing_url = &history.entries()[existing_index].url;

    // A pending fresh load of exactly the URL of the entry the renderer
    // names: pressing enter in the location bar on that page. The renderer
    // reloads instead of creating a new entry, so the existing entry stays
    // and the pending one is dropped.
    if let Some(pending) = history.pending_new_entry() {
        if pending.page_id == INVALID_PAGE_ID
            && pending.url == params.url
            && pending.url == *existing_url
        {
            return NavigationType::SamePage;
        }
    }

    if !is_main_frame {
        // New subframe loads always get fresh ids, so this one is automatic.
        assert!(
            history.last_committed_entry().is_some(),
            "subframe report for an existing page with nothing committed"
        );
        return NavigationType::AutoSubframe;
    }

    // Back/forward to an entry, including one that only differs from its
    // neighbour by fragment.
    if history.pending_index() == Some(existing_index) {
        return NavigationType::ExistingPage;
    }

    if are_urls_in_page_navigation(existing_url, &params.url) {
        return NavigationType::InPage;
    }

    NavigationType::ExistingPage
}
