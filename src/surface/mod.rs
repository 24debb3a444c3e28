//! Rendering surface contract.
//!
//! The shell core never renders web content itself. It drives an embedded
//! browsing surface through [`ContentSurface`] and reacts to the
//! [`SurfaceEvent`]s the surface reports back. The GUI build backs this
//! with a wry WebView; the demo binary and tests use [`headless::HeadlessSurface`].

pub mod headless;

/// Events emitted by a content surface as a page loads and navigates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A page load started.
    LoadStart,
    /// The page load finished or was aborted.
    LoadStop,
    /// The document title changed.
    TitleChanged(String),
    /// The page reported a favicon URL.
    FaviconChanged(String),
    /// The document location changed. `in_page` distinguishes hash-only
    /// navigations, which must not reset favicon or manifest state.
    LocationChanged { url: String, in_page: bool },
    /// The preload script found a `<link rel="manifest">` in the page,
    /// before any page script ran.
    ManifestDetected {
        href: String,
        cross_origin: Option<String>,
    },
    /// The page asked to open a new window (e.g. `window.open` or a
    /// targeted link). `app_id` is carried when the opener passed one in
    /// the window features.
    OpenWindowRequested {
        url: Option<String>,
        app_id: Option<String>,
    },
}

/// The embedded web-content host consumed by tab and window controllers.
///
/// Navigation methods are fire-and-forget: failures surface as the absence
/// of subsequent events, never as return values.
pub trait ContentSurface {
    /// Navigate to a URL.
    fn navigate(&mut self, url: &str);
    /// Stop the current page load.
    fn stop(&mut self);
    /// Reload the current page.
    fn reload(&mut self);
    /// Go back one entry in session history.
    fn go_back(&mut self);
    /// Go forward one entry in session history.
    fn go_forward(&mut self);
    /// Whether session history has a previous entry.
    fn can_go_back(&self) -> bool;
    /// Whether session history has a next entry.
    fn can_go_forward(&self) -> bool;
    /// Show or hide the surface.
    fn set_visible(&mut self, visible: bool);
    /// Raise or lower the surface's resource priority.
    fn set_active(&mut self, active: bool);
    /// Take all events emitted since the last call, in order.
    fn drain_events(&mut self) -> Vec<SurfaceEvent>;
}

/// Creates content surfaces for newly opened tabs and windows.
pub trait SurfaceFactory {
    fn create_surface(&self) -> Box<dyn ContentSurface>;
}
