//! Window lifecycle.
//!
//! A window is one of three kinds: the home screen, tabbed browser chrome,
//! or a standalone web app window. Kind-specific state lives in a closed
//! tagged variant; the shared capability set is show, hide, pump and
//! destroy-by-drop.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::warn;
use url::Url;

use crate::managers::tab_controller::{TabController, TabRequest};
use crate::surface::{ContentSurface, SurfaceEvent, SurfaceFactory};
use crate::types::web_app::WebApp;
use crate::types::window::WindowKind;

/// URL the home screen surface is navigated to.
pub const HOME_URL: &str = "about:home";

/// Requests a window bubbles up to the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowRequest {
    /// A page in this window asked to open a new top-level window.
    OpenWindow {
        url: Option<String>,
        app_id: Option<String>,
    },
}

/// Outcome of closing a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabCloseOutcome {
    /// The tab was destroyed; the window still has tabs.
    Closed,
    /// The last tab was destroyed; the window itself should now close.
    WindowEmpty,
    /// No such tab; nothing happened.
    NotFound,
}

/// Kind-specific window state.
enum WindowState {
    Home {
        surface: Box<dyn ContentSurface>,
    },
    Browser {
        tabs: BTreeMap<u32, TabController>,
        /// Total number of tabs ever created in this window. Tab IDs are
        /// allocated from this counter and never reused.
        tab_count: u32,
        current_tab: Option<u32>,
    },
    Standalone {
        surface: Box<dyn ContentSurface>,
        current_url: String,
        title: String,
        theme_color: Option<String>,
    },
}

/// Controller for a single shell window.
pub struct WindowController {
    id: u32,
    visible: bool,
    state: WindowState,
    factory: Rc<dyn SurfaceFactory>,
}

impl WindowController {
    /// Creates the home screen window.
    pub fn new_home(id: u32, factory: Rc<dyn SurfaceFactory>) -> Self {
        let mut surface = factory.create_surface();
        surface.navigate(HOME_URL);
        Self {
            id,
            visible: false,
            state: WindowState::Home { surface },
            factory,
        }
    }

    /// Creates a browser window with one initial tab.
    pub fn new_browser(id: u32, url: Option<&str>, factory: Rc<dyn SurfaceFactory>) -> Self {
        let mut window = Self {
            id,
            visible: false,
            state: WindowState::Browser {
                tabs: BTreeMap::new(),
                tab_count: 0,
                current_tab: None,
            },
            factory,
        };
        window.create_tab(url);
        window
    }

    /// Creates a standalone window for a web app.
    pub fn new_standalone(
        id: u32,
        url: &str,
        web_app: Option<&WebApp>,
        factory: Rc<dyn SurfaceFactory>,
    ) -> Self {
        let title = web_app
            .and_then(WebApp::shortest_name)
            .map(str::to_string)
            .or_else(|| Self::hostname_of(url))
            .unwrap_or_default();
        let theme_color = web_app.and_then(|app| app.theme_color.clone());

        let mut surface = factory.create_surface();
        surface.navigate(url);

        Self {
            id,
            visible: false,
            state: WindowState::Standalone {
                surface,
                current_url: url.to_string(),
                title,
                theme_color,
            },
            factory,
        }
    }

    fn hostname_of(url: &str) -> Option<String> {
        Url::parse(url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> WindowKind {
        match self.state {
            WindowState::Home { .. } => WindowKind::Home,
            WindowState::Browser { .. } => WindowKind::Browser,
            WindowState::Standalone { .. } => WindowKind::Standalone,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    // === Visibility and activation ===

    /// Show the window. For browser windows this also raises the resource
    /// priority of exactly the selected tab; the other tabs stay
    /// backgrounded.
    pub fn show(&mut self) {
        self.visible = true;
        match &mut self.state {
            WindowState::Home { surface } | WindowState::Standalone { surface, .. } => {
                surface.set_visible(true);
                surface.set_active(true);
            }
            WindowState::Browser { tabs, current_tab, .. } => {
                if let Some(tab) = current_tab.and_then(|id| tabs.get_mut(&id)) {
                    tab.set_surface_visible(true);
                    tab.set_active(true);
                }
            }
        }
    }

    /// Hide the window and lower the priority of its visible surface.
    pub fn hide(&mut self) {
        self.visible = false;
        match &mut self.state {
            WindowState::Home { surface } | WindowState::Standalone { surface, .. } => {
                surface.set_visible(false);
                surface.set_active(false);
            }
            WindowState::Browser { tabs, current_tab, .. } => {
                if let Some(tab) = current_tab.and_then(|id| tabs.get_mut(&id)) {
                    tab.set_surface_visible(false);
                    tab.set_active(false);
                }
            }
        }
    }

    // === Tabs (browser windows only) ===

    /// Create a new tab and select it. Returns the new tab's ID, or `None`
    /// for windows that have no tabs.
    pub fn create_tab(&mut self, url: Option<&str>) -> Option<u32> {
        let factory = Rc::clone(&self.factory);
        let window_id = self.id;
        let tab_id = match &mut self.state {
            WindowState::Browser { tabs, tab_count, .. } => {
                let tab_id = *tab_count;
                let tab = TabController::new(tab_id, window_id, url, factory.create_surface());
                tabs.insert(tab_id, tab);
                *tab_count += 1;
                Some(tab_id)
            }
            _ => {
                warn!(window = window_id, "tab requested on a window without tabs");
                None
            }
        };
        if let Some(tab_id) = tab_id {
            self.switch_tab(tab_id);
        }
        tab_id
    }

    /// Switch the selected tab. Priority follows selection while the
    /// window is visible.
    pub fn switch_tab(&mut self, tab_id: u32) {
        let visible = self.visible;
        if let WindowState::Browser { tabs, current_tab, .. } = &mut self.state {
            if !tabs.contains_key(&tab_id) {
                warn!(window = self.id, tab = tab_id, "switch to unknown tab");
                return;
            }
            if let Some(previous) = current_tab.and_then(|id| tabs.get_mut(&id)) {
                previous.deselect();
                previous.set_active(false);
            }
            if let Some(tab) = tabs.get_mut(&tab_id) {
                tab.select();
                if visible {
                    tab.set_active(true);
                }
            }
            *current_tab = Some(tab_id);
        }
    }

    /// Destroy a tab. If it was selected, the tab with the highest
    /// remaining ID (the most recently created survivor) is selected. When
    /// no tabs remain the window reports that it should close.
    pub fn close_tab(&mut self, tab_id: u32) -> TabCloseOutcome {
        let was_current = match &mut self.state {
            WindowState::Browser { tabs, current_tab, .. } => {
                if tabs.remove(&tab_id).is_none() {
                    return TabCloseOutcome::NotFound;
                }
                let was_current = *current_tab == Some(tab_id);
                if was_current {
                    *current_tab = None;
                }
                was_current
            }
            _ => return TabCloseOutcome::NotFound,
        };

        let successor = match &self.state {
            WindowState::Browser { tabs, .. } => tabs.keys().next_back().copied(),
            _ => None,
        };

        match successor {
            Some(successor) => {
                if was_current {
                    self.switch_tab(successor);
                }
                TabCloseOutcome::Closed
            }
            None => TabCloseOutcome::WindowEmpty,
        }
    }

    /// ID of the selected tab, if this window has tabs.
    pub fn current_tab(&self) -> Option<u32> {
        match &self.state {
            WindowState::Browser { current_tab, .. } => *current_tab,
            _ => None,
        }
    }

    pub fn tab(&self, tab_id: u32) -> Option<&TabController> {
        match &self.state {
            WindowState::Browser { tabs, .. } => tabs.get(&tab_id),
            _ => None,
        }
    }

    pub fn tab_mut(&mut self, tab_id: u32) -> Option<&mut TabController> {
        match &mut self.state {
            WindowState::Browser { tabs, .. } => tabs.get_mut(&tab_id),
            _ => None,
        }
    }

    /// Tab IDs in creation order.
    pub fn tab_ids(&self) -> Vec<u32> {
        match &self.state {
            WindowState::Browser { tabs, .. } => tabs.keys().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn tab_len(&self) -> usize {
        match &self.state {
            WindowState::Browser { tabs, .. } => tabs.len(),
            _ => 0,
        }
    }

    // === Standalone metadata ===

    /// Title shown in a standalone window's title bar.
    pub fn title(&self) -> Option<&str> {
        match &self.state {
            WindowState::Standalone { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn theme_color(&self) -> Option<&str> {
        match &self.state {
            WindowState::Standalone { theme_color, .. } => theme_color.as_deref(),
            _ => None,
        }
    }

    /// URL of the page a standalone window currently shows.
    pub fn current_url(&self) -> Option<&str> {
        match &self.state {
            WindowState::Standalone { current_url, .. } => Some(current_url),
            _ => None,
        }
    }

    // === Event pumping ===

    /// Drain surface events for every surface this window owns.
    ///
    /// In-page open-window requests from browser tabs become new tabs in
    /// this window; requests from the home screen or a standalone window
    /// bubble up for the manager to open a top-level window.
    pub fn pump(&mut self) -> Vec<WindowRequest> {
        let mut requests = Vec::new();
        let mut opened = Vec::new();
        match &mut self.state {
            WindowState::Browser { tabs, .. } => {
                for tab in tabs.values_mut() {
                    for request in tab.pump() {
                        match request {
                            TabRequest::OpenWindow { url } => opened.push(url),
                        }
                    }
                }
            }
            WindowState::Home { surface } => {
                for event in surface.drain_events() {
                    if let SurfaceEvent::OpenWindowRequested { url, app_id } = event {
                        requests.push(WindowRequest::OpenWindow { url, app_id });
                    }
                }
            }
            WindowState::Standalone {
                surface,
                current_url,
                title,
                ..
            } => {
                for event in surface.drain_events() {
                    match event {
                        SurfaceEvent::LocationChanged { url, .. } => {
                            if let Some(hostname) = Self::hostname_of(&url) {
                                *title = hostname;
                            }
                            *current_url = url;
                        }
                        SurfaceEvent::OpenWindowRequested { url, app_id } => {
                            requests.push(WindowRequest::OpenWindow { url, app_id });
                        }
                        _ => {}
                    }
                }
            }
        }
        for url in opened {
            self.create_tab(url.as_deref());
        }
        requests
    }
}
