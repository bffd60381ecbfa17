//! Back/forward drop-down menus over a navigation history.
//!
//! [`BackForwardMenuModel`] derives the recent-history items, same-site
//! chapter stops and the "Show Full History" item from any
//! [`HistorySource`], most commonly a
//! [`NavigationHistory`](tabnav_history::NavigationHistory).

pub mod back_forward;
pub mod domain;

pub use back_forward::{
    BackForwardMenuModel, HistorySource, MenuCommand, MenuDirection, MenuItem,
    SHOW_FULL_HISTORY_LABEL,
};
pub use domain::{registrable_domain, same_domain_or_host};
