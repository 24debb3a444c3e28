//! Tab lifecycle and URL bar state.
//!
//! A tab owns one content surface and tracks everything the chrome shows
//! for it: current URL, loading state, URL bar text and button mode,
//! back/forward availability, favicon, and any web app manifest link the
//! page declared.

use tracing::debug;
use url::Url;

use crate::services::manifest_fetcher::{self, ManifestRequest};
use crate::surface::{ContentSurface, SurfaceEvent};
use crate::types::errors::FetchError;
use crate::types::tab::{
    TabSummary, UrlBarButtonMode, ABOUT_BLANK_URL, FAVICON_PLACEHOLDER, NEW_TAB_URL,
};

/// Requests a tab bubbles up to its owning window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRequest {
    /// The page asked to open a new window; browser windows open a new
    /// tab in place instead.
    OpenWindow { url: Option<String> },
}

/// Controller for a single browser tab.
pub struct TabController {
    id: u32,
    window_id: u32,
    surface: Box<dyn ContentSurface>,
    current_url: String,
    title: String,
    url_bar_value: String,
    url_bar_focused: bool,
    loading: bool,
    selected: bool,
    favicon_url: String,
    manifest_url: Option<String>,
    manifest_cross_origin: Option<String>,
    can_go_back: bool,
    can_go_forward: bool,
}

impl TabController {
    /// Creates a tab and navigates its surface to the given URL, or to the
    /// new tab page when none (or `about:blank`) is given.
    pub fn new(
        id: u32,
        window_id: u32,
        url: Option<&str>,
        mut surface: Box<dyn ContentSurface>,
    ) -> Self {
        let initial_url = match url {
            Some(url) if !url.is_empty() && url != ABOUT_BLANK_URL => url.to_string(),
            _ => NEW_TAB_URL.to_string(),
        };
        surface.navigate(&initial_url);

        Self {
            id,
            window_id,
            surface,
            current_url: initial_url.clone(),
            title: String::new(),
            url_bar_value: initial_url,
            url_bar_focused: false,
            loading: false,
            selected: false,
            favicon_url: FAVICON_PLACEHOLDER.to_string(),
            manifest_url: None,
            manifest_cross_origin: None,
            can_go_back: false,
            can_go_forward: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn window_id(&self) -> u32 {
        self.window_id
    }

    // === Selection and activation ===

    /// Select this tab: its panel becomes the visible one in the window.
    pub fn select(&mut self) {
        self.selected = true;
        self.surface.set_visible(true);
    }

    /// Deselect this tab and hide its panel.
    pub fn deselect(&mut self) {
        self.selected = false;
        self.surface.set_visible(false);
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Raise or lower the surface's resource priority.
    pub fn set_active(&mut self, active: bool) {
        self.surface.set_active(active);
    }

    /// Show or hide the surface without changing selection, used when the
    /// owning window is shown or hidden.
    pub fn set_surface_visible(&mut self, visible: bool) {
        self.surface.set_visible(visible);
    }

    // === URL bar ===

    pub fn focus_url_bar(&mut self) {
        self.url_bar_focused = true;
    }

    pub fn blur_url_bar(&mut self) {
        self.url_bar_focused = false;
    }

    pub fn is_url_bar_focused(&self) -> bool {
        self.url_bar_focused
    }

    pub fn set_url_bar_value(&mut self, value: &str) {
        self.url_bar_value = value.to_string();
    }

    pub fn url_bar_value(&self) -> &str {
        &self.url_bar_value
    }

    /// The action the URL bar button currently performs.
    ///
    /// Derived, never cached: `Stop` while loading, `Reload` when the bar
    /// is unfocused and its text equals the current URL, `Go` otherwise.
    pub fn url_bar_button_mode(&self) -> UrlBarButtonMode {
        if self.loading {
            UrlBarButtonMode::Stop
        } else if !self.url_bar_focused && self.url_bar_value == self.current_url {
            UrlBarButtonMode::Reload
        } else {
            UrlBarButtonMode::Go
        }
    }

    /// Submit the URL bar contents as a navigation.
    ///
    /// Tries the text as an absolute URL, then with an `http://` prefix.
    /// If neither parses the submission is a no-op.
    pub fn submit_url_bar(&mut self) {
        let input = self.url_bar_value.clone();
        let url = match Url::parse(&input) {
            Ok(url) => url,
            Err(_) => match Url::parse(&format!("http://{}", input)) {
                Ok(url) => url,
                Err(_) => return,
            },
        };
        self.surface.navigate(url.as_str());
        self.url_bar_focused = false;
    }

    /// Dispatch the action implied by the button's current mode.
    pub fn press_url_bar_button(&mut self) {
        match self.url_bar_button_mode() {
            UrlBarButtonMode::Go => self.submit_url_bar(),
            UrlBarButtonMode::Stop => self.surface.stop(),
            UrlBarButtonMode::Reload => self.surface.reload(),
        }
    }

    // === History ===

    pub fn go_back(&mut self) {
        self.surface.go_back();
    }

    pub fn go_forward(&mut self) {
        self.surface.go_forward();
    }

    pub fn can_go_back(&self) -> bool {
        self.can_go_back
    }

    pub fn can_go_forward(&self) -> bool {
        self.can_go_forward
    }

    // === Surface events ===

    /// Drain and apply all pending surface events, returning any requests
    /// for the owning window.
    pub fn pump(&mut self) -> Vec<TabRequest> {
        let mut requests = Vec::new();
        for event in self.surface.drain_events() {
            match event {
                SurfaceEvent::LoadStart => self.loading = true,
                SurfaceEvent::LoadStop => self.loading = false,
                SurfaceEvent::TitleChanged(title) => self.title = title,
                SurfaceEvent::FaviconChanged(url) => self.handle_favicon_update(&url),
                SurfaceEvent::LocationChanged { url, in_page } => {
                    if in_page {
                        self.handle_in_page_location_change(url);
                    } else {
                        self.handle_location_change(url);
                    }
                }
                SurfaceEvent::ManifestDetected { href, cross_origin } => {
                    debug!(tab = self.id, href = %href, "manifest link detected");
                    self.manifest_url = Some(href);
                    self.manifest_cross_origin = cross_origin;
                }
                SurfaceEvent::OpenWindowRequested { url, .. } => {
                    requests.push(TabRequest::OpenWindow { url });
                }
            }
        }
        requests
    }

    /// A committed navigation: reset per-page state and re-query history.
    fn handle_location_change(&mut self, url: String) {
        if url == NEW_TAB_URL {
            self.url_bar_value.clear();
            self.url_bar_focused = true;
        } else {
            self.url_bar_value = url.clone();
        }
        self.current_url = url;

        // Reset favicon
        self.favicon_url = FAVICON_PLACEHOLDER.to_string();

        // Reset manifest link; any in-flight fetch result for the old page
        // is now stale and will be ignored.
        self.manifest_url = None;
        self.manifest_cross_origin = None;

        self.update_back_forward();
    }

    /// An in-page (hash) change: the document did not reload, so favicon
    /// and manifest state stay.
    fn handle_in_page_location_change(&mut self, url: String) {
        self.url_bar_value = url.clone();
        self.current_url = url;
        self.update_back_forward();
    }

    fn handle_favicon_update(&mut self, url: &str) {
        // Ignore anything that does not parse as a URL.
        if Url::parse(url).is_ok() {
            self.favicon_url = url.to_string();
        }
    }

    fn update_back_forward(&mut self) {
        self.can_go_back = self.surface.can_go_back();
        self.can_go_forward = self.surface.can_go_forward();
    }

    // === Page metadata ===

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn favicon_url(&self) -> &str {
        &self.favicon_url
    }

    /// URL of the currently loaded page.
    pub fn document_url(&self) -> &str {
        &self.current_url
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Manifest link href reported for the current page, if any.
    pub fn manifest_url(&self) -> Option<&str> {
        self.manifest_url.as_deref()
    }

    /// Build the manifest fetch request for the current page, deriving the
    /// credentials mode from the link's `crossorigin` attribute.
    pub fn manifest_fetch_request(&self) -> Result<ManifestRequest, FetchError> {
        manifest_fetcher::build_request(
            &self.current_url,
            self.manifest_url.as_deref(),
            self.manifest_cross_origin.as_deref(),
        )
    }

    /// Snapshot for the chrome.
    pub fn summary(&self) -> TabSummary {
        TabSummary {
            id: self.id,
            title: self.title.clone(),
            url: self.current_url.clone(),
            favicon_url: self.favicon_url.clone(),
            loading: self.loading,
            selected: self.selected,
        }
    }
}
