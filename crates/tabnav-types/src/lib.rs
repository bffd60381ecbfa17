//! Foundation types for tabnav.
//!
//! This crate contains the small, dependency-light types shared by the
//! history engine, the back/forward menu model and the desktop driver:
//! page transitions, navigation gestures, opaque ids, configuration and
//! the error type.

pub mod config;
pub mod error;
pub mod ids;
pub mod transition;

pub use config::{HistoryConfig, MenuConfig, TabnavConfig};
pub use error::{Result, TabnavError};
pub use ids::{INVALID_PAGE_ID, SiteInstanceId, UniqueId};
pub use transition::{NavigationGesture, PageTransition};
