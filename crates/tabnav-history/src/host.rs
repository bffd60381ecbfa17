//! The narrow interfaces between a [`NavigationHistory`](crate::NavigationHistory)
//! and the tab that hosts it.
//!
//! Navigation is asynchronous from the history's point of view:
//!
//! 1. An operation such as `load_url` or `go_back` records a pending entry
//!    and calls [`NavigationRequestSink::navigate_to_pending_entry`], then
//!    returns immediately.
//! 2. Some time later the renderer reports what it actually committed. The
//!    host hands that report to `renderer_did_navigate` directly, or queues
//!    it behind a [`CommitReportSource`] and calls `pump_reports`.
//!
//! Callers must not assume the entry list changed when step 1 returns.

use tabnav_types::{NavigationGesture, PageTransition, SiteInstanceId};
use url::Url;

use crate::entry::NavigationEntry;

// -----------------------------------------------------------------------
// FrameNavigateParams
// -----------------------------------------------------------------------

/// A renderer's report that a frame committed a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNavigateParams {
    /// Renderer page id, `-1` for pages the renderer could not number.
    pub page_id: i32,
    pub url: Url,
    pub referrer: Option<Url>,
    pub transition: PageTransition,
    /// Renderer group that produced the report.
    pub site_instance: SiteInstanceId,
    pub is_post: bool,
    /// Serialized certificate state, opaque to the history.
    pub security_info: Vec<u8>,
    pub gesture: NavigationGesture,
    /// Serialized renderer state for the committed page.
    pub content_state: Vec<u8>,
    pub http_status_code: u16,
}

impl FrameNavigateParams {
    /// A plain main-frame report with a user gesture and a 200 status.
    pub fn new(page_id: i32, url: Url, transition: PageTransition, site: SiteInstanceId) -> Self {
        Self {
            page_id,
            url,
            referrer: None,
            transition,
            site_instance: site,
            is_post: false,
            security_info: Vec::new(),
            gesture: NavigationGesture::User,
            content_state: Vec::new(),
            http_status_code: 200,
        }
    }
}

// -----------------------------------------------------------------------
// Capability traits
// -----------------------------------------------------------------------

/// Starts loads on behalf of the history.
pub trait NavigationRequestSink {
    /// Begin displaying `entry` (the pending entry).
    ///
    /// Return `false` if the load could not even be started; the history
    /// then discards its pending entry and keeps showing the last
    /// committed one.
    fn navigate_to_pending_entry(&mut self, entry: &NavigationEntry, reload: bool) -> bool;
}

/// Asks the user whether a POST should be resubmitted.
pub trait RepostConfirmationSink {
    /// Present the confirmation for the entry at `entry_index`.
    ///
    /// On acceptance the host calls `reload(false)` on the history.
    fn confirm_repost(&mut self, entry_index: usize);
}

/// A queue of commit reports waiting to be classified.
pub trait CommitReportSource {
    /// The next report, in the order the renderer produced them.
    fn next_report(&mut self) -> Option<FrameNavigateParams>;
}

// -----------------------------------------------------------------------
// NavigationHost
// -----------------------------------------------------------------------

/// The outbound collaborators a history is constructed with.
pub struct NavigationHost {
    pub requests: Box<dyn NavigationRequestSink>,
    pub repost: Box<dyn RepostConfirmationSink>,
}

impl NavigationHost {
    pub fn new(
        requests: Box<dyn NavigationRequestSink>,
        repost: Box<dyn RepostConfirmationSink>,
    ) -> Self {
        Self { requests, repost }
    }

    /// A host that starts every navigation and declines every repost.
    ///
    /// Useful for histories driven entirely by `commit_pending_entry`.
    pub fn detached() -> Self {
        Self::new(Box::new(AcceptAll), Box::new(DeclineRepost))
    }
}

struct AcceptAll;

impl NavigationRequestSink for AcceptAll {
    fn navigate_to_pending_entry(&mut self, _entry: &NavigationEntry, _reload: bool) -> bool {
        true
    }
}

struct DeclineRepost;

impl RepostConfirmationSink for DeclineRepost {
    fn confirm_repost(&mut self, entry_index: usize) {
        log::debug!("Repost of entry {entry_index} declined (detached host)");
    }
}

impl CommitReportSource for std::collections::VecDeque<FrameNavigateParams> {
    fn next_report(&mut self) -> Option<FrameNavigateParams> {
        self.pop_front()
    }
}
