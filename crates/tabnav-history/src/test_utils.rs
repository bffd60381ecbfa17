//! Shared test utilities for the history engine.
//!
//! Provides a [`TestHost`] that records navigation and repost requests, an
//! event recorder and a [`TestRenderer`] that commits pending entries the
//! way a renderer process would.

use std::cell::RefCell;
use std::rc::Rc;

use tabnav_types::{HistoryConfig, SiteInstanceId};
use url::Url;

use crate::entry::NavigationEntry;
use crate::events::{NavigationEvent, NavigationObserver};
use crate::history::NavigationHistory;
use crate::host::{
    FrameNavigateParams, NavigationHost, NavigationRequestSink, RepostConfirmationSink,
};

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// What the host was asked to do.
#[derive(Debug, Default)]
pub struct HostLog {
    /// `(url, reload)` per navigation request.
    pub navigations: Vec<(Url, bool)>,
    pub reposts: Vec<usize>,
    /// Refuse to start navigations.
    pub refuse: bool,
}

/// Host collaborator writing into a shared [`HostLog`].
pub struct TestHost {
    log: Rc<RefCell<HostLog>>,
}

impl NavigationRequestSink for TestHost {
    fn navigate_to_pending_entry(&mut self, entry: &NavigationEntry, reload: bool) -> bool {
        let mut log = self.log.borrow_mut();
        log.navigations.push((entry.url.clone(), reload));
        !log.refuse
    }
}

impl RepostConfirmationSink for TestHost {
    fn confirm_repost(&mut self, entry_index: usize) {
        self.log.borrow_mut().reposts.push(entry_index);
    }
}

pub fn test_host() -> (NavigationHost, Rc<RefCell<HostLog>>) {
    let log = Rc::new(RefCell::new(HostLog::default()));
    let host = NavigationHost::new(
        Box::new(TestHost {
            log: Rc::clone(&log),
        }),
        Box::new(TestHost {
            log: Rc::clone(&log),
        }),
    );
    (host, log)
}

pub fn new_history() -> (NavigationHistory, Rc<RefCell<HostLog>>) {
    new_history_with(&HistoryConfig::default())
}

pub fn new_history_with(config: &HistoryConfig) -> (NavigationHistory, Rc<RefCell<HostLog>>) {
    let (host, log) = test_host();
    (NavigationHistory::new(host, config).unwrap(), log)
}

struct RecordingObserver(Rc<RefCell<Vec<NavigationEvent>>>);

impl NavigationObserver for RecordingObserver {
    fn on_navigation_event(&mut self, event: &NavigationEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

/// Subscribe a recorder and return its event log.
pub fn record_events(history: &mut NavigationHistory) -> Rc<RefCell<Vec<NavigationEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    history.add_observer(Box::new(RecordingObserver(Rc::clone(&events))));
    events
}

/// Stands in for a renderer in one renderer group.
pub struct TestRenderer {
    pub site: SiteInstanceId,
}

impl Default for TestRenderer {
    fn default() -> Self {
        Self {
            site: SiteInstanceId(1),
        }
    }
}

impl TestRenderer {
    /// Report a commit of the pending entry: the next page id for fresh
    /// loads, the entry's own id for history navigations.
    pub fn commit_pending(&mut self, history: &mut NavigationHistory) -> bool {
        let entry = history.pending_entry().expect("nothing pending");
        let page_id = if entry.is_committed_page_id() {
            entry.page_id
        } else {
            history.max_page_id(self.site) + 1
        };
        let params = FrameNavigateParams::new(page_id, entry.url.clone(), entry.transition, self.site);
        history.renderer_did_navigate(&params)
    }

    /// Load `url` as a link click and commit it.
    pub fn navigate_and_commit(&mut self, history: &mut NavigationHistory, target: &str) {
        history.load_url(url(target), None, tabnav_types::PageTransition::LINK);
        assert!(self.commit_pending(history), "commit of {target} was ignored");
    }
}
