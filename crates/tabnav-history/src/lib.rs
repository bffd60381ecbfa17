//! Per-tab session history.
//!
//! A [`NavigationHistory`] owns the ordered back/forward list of one tab,
//! tracks the in-flight (pending) navigation and an optional transient
//! entry, and turns renderer commit reports into list changes via
//! [`classify_navigation`]. Hosts plug in through the capability traits in
//! [`host`] and listen through [`NavigationObserver`].

pub mod classify;
pub mod commit;
pub mod entry;
pub mod events;
pub mod history;
pub mod host;
pub mod restore;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use classify::{NavigationType, are_urls_in_page_navigation, classify_navigation};
pub use entry::{FaviconStatus, NavigationEntry, PageType, SecurityStyle, SslStatus};
pub use events::{
    EntryHandle, LoadCommittedDetails, NavigationEvent, NavigationObserver, ObserverId,
    PrunedDetails,
};
pub use history::NavigationHistory;
pub use host::{
    CommitReportSource, FrameNavigateParams, NavigationHost, NavigationRequestSink,
    RepostConfirmationSink,
};
pub use restore::{SessionSnapshot, TabNavigation};
