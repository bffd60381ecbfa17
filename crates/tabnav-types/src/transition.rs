//! Page transition types and navigation gestures.
//!
//! A [`PageTransition`] packs a core type in the low byte and qualifier
//! bits in the high bits, the same layout renderers put on the wire, so
//! a transition received in a commit report can be stored unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the user (or the page) got to a navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTransition(u32);

impl PageTransition {
    // -------------------------------------------------------------------
    // Core types
    // -------------------------------------------------------------------

    /// The user followed a link.
    pub const LINK: Self = Self(0);
    /// The user typed the URL into the location bar.
    pub const TYPED: Self = Self(1);
    /// The user picked a bookmark or a suggestion.
    pub const AUTO_BOOKMARK: Self = Self(2);
    /// A subframe loaded automatically as part of its parent page.
    pub const AUTO_SUBFRAME: Self = Self(3);
    /// The user navigated inside a subframe.
    pub const MANUAL_SUBFRAME: Self = Self(4);
    /// The URL was generated from something the user typed.
    pub const GENERATED: Self = Self(5);
    /// The start (home) page.
    pub const START_PAGE: Self = Self(6);
    /// A form submission.
    pub const FORM_SUBMIT: Self = Self(7);
    /// A reload, or a restored session entry.
    pub const RELOAD: Self = Self(8);
    /// A keyword search.
    pub const KEYWORD: Self = Self(9);
    /// Visit generated for a keyword search.
    pub const KEYWORD_GENERATED: Self = Self(10);

    // -------------------------------------------------------------------
    // Qualifiers
    // -------------------------------------------------------------------

    /// Set on back/forward navigations.
    pub const FORWARD_BACK: u32 = 0x0100_0000;
    /// First navigation of a redirect chain.
    pub const CHAIN_START: u32 = 0x1000_0000;
    /// Last navigation of a redirect chain.
    pub const CHAIN_END: u32 = 0x2000_0000;
    /// Redirect caused by script or a meta refresh.
    pub const CLIENT_REDIRECT: u32 = 0x4000_0000;
    /// Redirect caused by an HTTP response.
    pub const SERVER_REDIRECT: u32 = 0x8000_0000;

    const CORE_MASK: u32 = 0xFF;
    const QUALIFIER_MASK: u32 = 0xFFFF_FF00;
    const REDIRECT_MASK: u32 = Self::CLIENT_REDIRECT | Self::SERVER_REDIRECT;

    /// Build a transition from its raw wire value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw wire value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The core type with every qualifier stripped.
    pub const fn core(self) -> Self {
        Self(self.0 & Self::CORE_MASK)
    }

    /// The qualifier bits.
    pub const fn qualifiers(self) -> u32 {
        self.0 & Self::QUALIFIER_MASK
    }

    /// Same core type with `qualifier` added.
    pub const fn with_qualifier(self, qualifier: u32) -> Self {
        Self(self.0 | (qualifier & Self::QUALIFIER_MASK))
    }

    /// Alias for [`core`](Self::core) reading better at call sites that
    /// normalize a transition.
    pub const fn strip_qualifiers(self) -> Self {
        self.core()
    }

    /// Whether this transition has the same core type as `other`.
    pub fn core_eq(self, other: Self) -> bool {
        self.core().0 == other.core().0
    }

    /// Whether the navigation happened in the top-level frame.
    pub fn is_main_frame(self) -> bool {
        let core = self.core();
        core != Self::AUTO_SUBFRAME && core != Self::MANUAL_SUBFRAME
    }

    /// Whether the navigation is one hop of a redirect.
    pub fn is_redirect(self) -> bool {
        self.0 & Self::REDIRECT_MASK != 0
    }

    /// Whether the back/forward qualifier is set.
    pub fn is_forward_back(self) -> bool {
        self.0 & Self::FORWARD_BACK != 0
    }

    fn core_name(self) -> &'static str {
        match self.core().0 {
            0 => "link",
            1 => "typed",
            2 => "auto_bookmark",
            3 => "auto_subframe",
            4 => "manual_subframe",
            5 => "generated",
            6 => "start_page",
            7 => "form_submit",
            8 => "reload",
            9 => "keyword",
            10 => "keyword_generated",
            _ => "unknown",
        }
    }
}

impl fmt::Display for PageTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.core_name())?;
        if self.is_forward_back() {
            f.write_str("|forward_back")?;
        }
        if self.0 & Self::CLIENT_REDIRECT != 0 {
            f.write_str("|client_redirect")?;
        }
        if self.0 & Self::SERVER_REDIRECT != 0 {
            f.write_str("|server_redirect")?;
        }
        Ok(())
    }
}

/// Whether a navigation was started by the user or by the page itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationGesture {
    /// Initiated by a user action (click, typing, menu).
    User,
    /// Initiated by script, a redirect or a timer.
    Auto,
    /// The renderer could not tell.
    #[default]
    Unknown,
}
