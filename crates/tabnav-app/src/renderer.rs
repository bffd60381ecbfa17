//! A simulated renderer process.
//!
//! The history hands navigation requests to a [`SimRenderer`]; the renderer
//! queues a commit report for the latest one, and the browser later drains
//! the queue into the history with `pump_reports`. A request made before
//! the previous one committed cancels it. Handles are cheap clones of
//! shared state, so one copy can live inside the history's host while the
//! browser keeps another.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tabnav_history::{
    CommitReportSource, FrameNavigateParams, NavigationEntry, NavigationHost,
    NavigationRequestSink, RepostConfirmationSink,
};
use tabnav_types::SiteInstanceId;
use url::Url;

#[derive(Debug)]
struct RendererState {
    site: SiteInstanceId,
    next_page_id: i32,
    reports: VecDeque<FrameNavigateParams>,
    requested: Vec<(Url, bool)>,
    repost_prompts: VecDeque<usize>,
}

/// Shared handle to one simulated renderer.
#[derive(Debug, Clone)]
pub struct SimRenderer {
    state: Rc<RefCell<RendererState>>,
}

impl SimRenderer {
    pub fn new(site: SiteInstanceId) -> Self {
        Self {
            state: Rc::new(RefCell::new(RendererState {
                site,
                next_page_id: 0,
                reports: VecDeque::new(),
                requested: Vec::new(),
                repost_prompts: VecDeque::new(),
            })),
        }
    }

    /// A host whose navigation and repost requests go to this renderer.
    pub fn host(&self) -> NavigationHost {
        NavigationHost::new(Box::new(self.clone()), Box::new(self.clone()))
    }

    pub fn site(&self) -> SiteInstanceId {
        self.state.borrow().site
    }

    /// Continue page numbering after `page_id`, as a renderer created for
    /// an already populated history does.
    pub fn continue_after(&self, page_id: i32) {
        let mut state = self.state.borrow_mut();
        state.next_page_id = state.next_page_id.max(page_id + 1);
    }

    /// Reports not yet handed to the history.
    pub fn queued_reports(&self) -> usize {
        self.state.borrow().reports.len()
    }

    /// Every `(url, reload)` navigation requested so far.
    pub fn requested(&self) -> Vec<(Url, bool)> {
        self.state.borrow().requested.clone()
    }

    /// The oldest unanswered repost confirmation, if any.
    pub fn take_repost_prompt(&self) -> Option<usize> {
        self.state.borrow_mut().repost_prompts.pop_front()
    }
}

impl NavigationRequestSink for SimRenderer {
    fn navigate_to_pending_entry(&mut self, entry: &NavigationEntry, reload: bool) -> bool {
        let mut state = self.state.borrow_mut();
        let page_id = if entry.is_committed_page_id() {
            entry.page_id
        } else {
            let id = state.next_page_id;
            state.next_page_id += 1;
            id
        };
        let mut params =
            FrameNavigateParams::new(page_id, entry.url.clone(), entry.transition, state.site);
        params.referrer = entry.referrer.clone();
        params.is_post = entry.has_post_data;
        params.content_state = entry.content_state.clone();

        // A new request cancels the load still in flight.
        if !state.reports.is_empty() {
            log::debug!(
                "Renderer {} dropping {} superseded load(s)",
                state.site,
                state.reports.len()
            );
            state.reports.clear();
        }
        log::debug!(
            "Renderer {} loading {} as page {page_id}{}",
            state.site,
            entry.url,
            if reload { " (reload)" } else { "" }
        );
        state.requested.push((entry.url.clone(), reload));
        state.reports.push_back(params);
        true
    }
}

impl RepostConfirmationSink for SimRenderer {
    fn confirm_repost(&mut self, entry_index: usize) {
        self.state.borrow_mut().repost_prompts.push_back(entry_index);
    }
}

impl CommitReportSource for SimRenderer {
    fn next_report(&mut self) -> Option<FrameNavigateParams> {
        self.state.borrow_mut().reports.pop_front()
    }
}
