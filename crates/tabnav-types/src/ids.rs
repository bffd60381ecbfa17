//! Opaque identifiers: site instances, entry unique ids and page ids.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Page id of an entry the renderer has not committed yet.
pub const INVALID_PAGE_ID: i32 = -1;

/// Handle grouping entries that share a renderer process.
///
/// The history engine never looks inside a site instance; it only
/// compares handles to disambiguate page ids reported by different
/// renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteInstanceId(pub u32);

impl fmt::Display for SiteInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site#{}", self.0)
    }
}

static NEXT_UNIQUE_ID: AtomicU32 = AtomicU32::new(1);

/// Session-scoped id of a navigation entry.
///
/// Unlike page ids, unique ids are assigned by the browser side and are
/// stable across reloads. UI state keyed on a navigation (info bars,
/// find-in-page results) compares unique ids to decide when to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueId(u32);

impl UniqueId {
    /// Allocate a fresh id from the process-wide counter.
    pub fn next() -> Self {
        Self(NEXT_UNIQUE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value (for logging).
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
