use serde::{Deserialize, Serialize};

/// URL the shell navigates new tabs to.
pub const NEW_TAB_URL: &str = "about:newtab";

/// URL treated as "no page": tabs opened on it start at the new tab page.
pub const ABOUT_BLANK_URL: &str = "about:blank";

/// Favicon shown until a page reports its own.
pub const FAVICON_PLACEHOLDER: &str = "images/favicon-placeholder.png";

/// Action the URL bar button performs when clicked.
///
/// Derived from tab state, never set directly: `Stop` while the page is
/// loading, `Reload` when the bar is unfocused and unedited, `Go` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlBarButtonMode {
    Go,
    Stop,
    Reload,
}

/// Snapshot of a tab's chrome-visible state, bubbled up to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TabSummary {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub favicon_url: String,
    pub loading: bool,
    pub selected: bool,
}
