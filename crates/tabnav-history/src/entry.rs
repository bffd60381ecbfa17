//! One node of the back/forward list and its favicon and SSL sub-state.

use tabnav_types::{INVALID_PAGE_ID, PageTransition, SiteInstanceId, UniqueId};
use url::Url;

// -----------------------------------------------------------------------
// PageType
// -----------------------------------------------------------------------

/// What kind of page an entry shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageType {
    #[default]
    Normal,
    Error,
    Interstitial,
}

// -----------------------------------------------------------------------
// FaviconStatus
// -----------------------------------------------------------------------

/// Favicon state of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconStatus {
    /// Where the icon was (or will be) fetched from.
    pub url: Option<Url>,
    /// Decoded icon pixels; empty until the icon has loaded.
    pub bitmap: Vec<u8>,
    /// False once the page is known to have no usable icon.
    pub valid: bool,
}

impl Default for FaviconStatus {
    fn default() -> Self {
        Self {
            url: None,
            bitmap: Vec::new(),
            valid: true,
        }
    }
}

impl FaviconStatus {
    /// Whether pixels are available to draw.
    pub fn has_bitmap(&self) -> bool {
        self.valid && !self.bitmap.is_empty()
    }
}

// -----------------------------------------------------------------------
// SslStatus
// -----------------------------------------------------------------------

/// Overall security presentation of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityStyle {
    #[default]
    Unknown,
    Unauthenticated,
    AuthenticationBroken,
    Authenticated,
}

/// Security state of an entry, reset on every new navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SslStatus {
    pub security_style: SecurityStyle,
    pub cert_id: i32,
    pub cert_status: u32,
    pub security_bits: i32,
    content_status: u32,
}

impl SslStatus {
    const MIXED_CONTENT: u32 = 1 << 0;
    const UNSAFE_CONTENT: u32 = 1 << 1;

    pub fn set_displayed_mixed_content(&mut self) {
        self.content_status |= Self::MIXED_CONTENT;
    }

    pub fn has_displayed_mixed_content(&self) -> bool {
        self.content_status & Self::MIXED_CONTENT != 0
    }

    pub fn set_ran_unsafe_content(&mut self) {
        self.content_status |= Self::UNSAFE_CONTENT;
    }

    pub fn has_ran_unsafe_content(&self) -> bool {
        self.content_status & Self::UNSAFE_CONTENT != 0
    }
}

// -----------------------------------------------------------------------
// NavigationEntry
// -----------------------------------------------------------------------

/// A navigable state of a tab.
///
/// Entries are owned by a [`NavigationHistory`](crate::NavigationHistory);
/// everything else reads them through borrows or
/// [`EntryHandle`](crate::EntryHandle)s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    /// Browser-assigned id, stable across reloads of the same navigation.
    pub unique_id: UniqueId,
    /// Renderer-assigned id, [`INVALID_PAGE_ID`] until committed.
    pub page_id: i32,
    /// Renderer group the page id belongs to. `None` for restored entries
    /// that have not been loaded yet.
    pub site_instance: Option<SiteInstanceId>,
    pub page_type: PageType,
    /// The URL actually loaded.
    pub url: Url,
    /// URL shown to the user when it differs from `url`.
    pub display_url: Option<Url>,
    /// What the user typed, before any rewriting.
    pub user_typed_url: Option<Url>,
    pub referrer: Option<Url>,
    pub title: String,
    pub favicon: FaviconStatus,
    /// Opaque renderer state used to restore form fields and scroll.
    pub content_state: Vec<u8>,
    pub transition: PageTransition,
    pub has_post_data: bool,
    pub ssl: SslStatus,
}

impl NavigationEntry {
    /// A fresh, uncommitted entry for `url`.
    pub fn new(url: Url, referrer: Option<Url>, transition: PageTransition) -> Self {
        Self {
            unique_id: UniqueId::next(),
            page_id: INVALID_PAGE_ID,
            site_instance: None,
            page_type: PageType::Normal,
            url,
            display_url: None,
            user_typed_url: None,
            referrer,
            title: String::new(),
            favicon: FaviconStatus::default(),
            content_state: Vec::new(),
            transition,
            has_post_data: false,
            ssl: SslStatus::default(),
        }
    }

    /// The URL to show in the location bar.
    pub fn display_url(&self) -> &Url {
        self.display_url.as_ref().unwrap_or(&self.url)
    }

    /// Title for menus and tab strips.
    ///
    /// Falls back to the file name for `file:` URLs and to the display URL
    /// otherwise.
    pub fn title_for_display(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        let url = self.display_url();
        if url.scheme() == "file" {
            if let Some(name) = url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
            {
                return name.to_string();
            }
        }
        url.to_string()
    }

    /// Whether the renderer has committed this entry.
    pub fn is_committed_page_id(&self) -> bool {
        self.page_id != INVALID_PAGE_ID
    }

    /// Give the entry a minimal content state if the renderer left it empty.
    ///
    /// A committed entry without state would be restored as a fresh load
    /// with no history item; a state naming just the URL is enough for the
    /// renderer to rebuild one.
    pub fn ensure_content_state(&mut self) {
        if self.content_state.is_empty() {
            self.content_state = self.url.as_str().as_bytes().to_vec();
        }
    }

    /// Clone with a freshly allocated unique id.
    pub fn clone_with_new_unique_id(&self) -> Self {
        Self {
            unique_id: UniqueId::next(),
            ..self.clone()
        }
    }
}
