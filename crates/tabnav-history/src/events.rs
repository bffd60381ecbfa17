//! Typed notifications published by a navigation history.

use url::Url;

use crate::classify::NavigationType;

// -----------------------------------------------------------------------
// EntryHandle
// -----------------------------------------------------------------------

/// A generation-checked reference to an entry.
///
/// Handles do not borrow the history. Any structural change to the entry
/// list (insertion, removal, pruning) bumps the history's generation, after
/// which [`NavigationHistory::resolve`](crate::NavigationHistory::resolve)
/// returns `None` for older handles instead of a different entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    pub index: usize,
    pub generation: u64,
}

// -----------------------------------------------------------------------
// Event payloads
// -----------------------------------------------------------------------

/// Details of a committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCommittedDetails {
    pub nav_type: NavigationType,
    /// Committed index before this navigation, if any.
    pub previous_index: Option<usize>,
    /// Committed URL before this navigation, if any.
    pub previous_url: Option<Url>,
    /// The newly committed entry.
    pub entry: EntryHandle,
    /// URL of the newly committed entry.
    pub url: Url,
    /// Not initiated by the user (redirect without a pending entry, or an
    /// automatic gesture).
    pub is_auto: bool,
    /// Only the fragment changed.
    pub is_in_page: bool,
    pub is_main_frame: bool,
    /// The entry replaced the previously committed one instead of being
    /// appended.
    pub did_replace_entry: bool,
    pub security_info: Vec<u8>,
    pub http_status_code: u16,
}

/// Entries dropped from the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunedDetails {
    /// `true` when the oldest entries were evicted for capacity, `false`
    /// when forward history was truncated.
    pub from_front: bool,
    pub count: usize,
}

/// Everything a history reports to its observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// A new pending entry was created for a fresh load.
    EntryPending,
    EntryCommitted(LoadCommittedDetails),
    EntriesPruned(PrunedDetails),
    /// An entry's presentation (title, favicon) changed in place.
    EntryChanged { index: usize },
    /// A transient entry went away; anything showing the active entry
    /// must be refreshed.
    StateInvalidated,
}

// -----------------------------------------------------------------------
// Observers
// -----------------------------------------------------------------------

/// Receives every event published by a history.
pub trait NavigationObserver {
    fn on_navigation_event(&mut self, event: &NavigationEvent);
}

/// Token returned by `add_observer`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Subscriber list owned by the publishing history.
#[derive(Default)]
pub(crate) struct ObserverList {
    observers: Vec<(ObserverId, Box<dyn NavigationObserver>)>,
    next_id: u64,
}

impl ObserverList {
    pub(crate) fn add(&mut self, observer: Box<dyn NavigationObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> Option<Box<dyn NavigationObserver>> {
        let pos = self.observers.iter().position(|(oid, _)| *oid == id)?;
        Some(self.observers.remove(pos).1)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every observer in subscription order.
    pub(crate) fn notify(&mut self, event: &NavigationEvent) {
        log::trace!("Navigation event: {event:?}");
        for (_, observer) in &mut self.observers {
            observer.on_navigation_event(event);
        }
    }
}
