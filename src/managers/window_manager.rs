//! Top-level window orchestration.
//!
//! The window manager owns every open window and its selector, routes
//! open/switch/close requests, decides which kind of window an app gets,
//! and enforces that exactly one window is visible at a time. Window IDs
//! are assigned in strict creation order and never reused within a
//! session.

use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use tracing::{error, warn};
use url::Url;

use crate::managers::window_controller::{TabCloseOutcome, WindowController, WindowRequest};
use crate::services::app_registry::{AppRegistry, AppRegistryTrait};
use crate::surface::SurfaceFactory;
use crate::types::events::{ShellEvent, ShellSignal};
use crate::types::manifest::DisplayMode;
use crate::types::web_app::WebApp;
use crate::types::window::WindowKind;

/// The reserved ID of the home screen window.
pub const HOME_WINDOW_ID: u32 = 0;

/// Icon size cached on standalone window selectors.
const SELECTOR_ICON_SIZE: u32 = 24;

/// The clickable affordance representing one open window in the window
/// switcher. Created and destroyed in lockstep with its window.
pub struct WindowSelector {
    window_id: u32,
    kind: WindowKind,
    icon_url: Option<Url>,
    selected: bool,
}

impl WindowSelector {
    fn new(window_id: u32, kind: WindowKind, icon_url: Option<Url>) -> Self {
        Self {
            window_id,
            kind,
            icon_url,
            selected: false,
        }
    }

    pub fn window_id(&self) -> u32 {
        self.window_id
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Icon cached for standalone windows, if their app had a usable one.
    pub fn icon_url(&self) -> Option<&Url> {
        self.icon_url.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self) {
        self.selected = true;
    }

    fn deselect(&mut self) {
        self.selected = false;
    }
}

/// Orchestrator for all shell windows.
pub struct WindowManager {
    windows: BTreeMap<u32, WindowController>,
    selectors: BTreeMap<u32, WindowSelector>,
    /// The number of windows opened in this session; the next window ID.
    window_count: u32,
    /// The ID of the currently displayed window.
    current_window: Option<u32>,
    signals: VecDeque<ShellSignal>,
    factory: Rc<dyn SurfaceFactory>,
}

impl WindowManager {
    /// Starts the window manager: creates the home screen window and makes
    /// it current.
    pub fn start(factory: Rc<dyn SurfaceFactory>) -> Self {
        let mut manager = Self {
            windows: BTreeMap::new(),
            selectors: BTreeMap::new(),
            window_count: 0,
            current_window: None,
            signals: VecDeque::new(),
            factory,
        };
        manager.create_window(WindowKind::Home, None, None);
        manager
    }

    /// Route a shell event.
    pub fn handle_event(&mut self, event: ShellEvent, registry: &AppRegistry) {
        match event {
            ShellEvent::OpenWindow { url, app_id } => {
                self.handle_open_window(url.as_deref(), app_id.as_deref(), registry);
            }
            ShellEvent::SwitchWindow { id } => self.switch_window(id),
            ShellEvent::CloseWindow { id } => self.close_window(id),
        }
    }

    /// Open a window, resolving the app ID against the registry when one
    /// was given. An unknown app ID falls back to a generic browser
    /// window rather than failing.
    fn handle_open_window(
        &mut self,
        url: Option<&str>,
        app_id: Option<&str>,
        registry: &AppRegistry,
    ) {
        match app_id {
            Some(app_id) => match registry.get_by_id(app_id) {
                Some(app) => {
                    // The app is cloned out of the registry so the borrow
                    // does not outlive lookup.
                    let app = app.clone();
                    self.open_window(url, Some(&app));
                }
                None => {
                    error!(app_id, "failed to get app to open window");
                    self.open_window(url, None);
                }
            },
            None => {
                self.open_window(url, None);
            }
        }
    }

    /// Open a window for an optional app, selecting the window kind from
    /// the app's declared display mode. Returns the new window's ID.
    pub fn open_window(&mut self, url: Option<&str>, web_app: Option<&WebApp>) -> u32 {
        // Only standalone gets its own chrome; fullscreen and minimal-ui
        // fall back to browser chrome, as does an absent display mode.
        let kind = match web_app.and_then(|app| app.display) {
            Some(DisplayMode::Standalone) => WindowKind::Standalone,
            _ => WindowKind::Browser,
        };
        self.create_window(kind, url, web_app)
    }

    /// Create a new window of the given kind and select it.
    fn create_window(
        &mut self,
        kind: WindowKind,
        url: Option<&str>,
        web_app: Option<&WebApp>,
    ) -> u32 {
        let id = self.window_count;
        let factory = Rc::clone(&self.factory);

        let controller = match kind {
            WindowKind::Home => WindowController::new_home(HOME_WINDOW_ID, factory),
            WindowKind::Browser => WindowController::new_browser(id, url, factory),
            WindowKind::Standalone => {
                let url = url
                    .map(str::to_string)
                    .or_else(|| web_app.map(|app| app.start_url.to_string()))
                    .unwrap_or_default();
                WindowController::new_standalone(id, &url, web_app, factory)
            }
        };

        let icon_url = match kind {
            WindowKind::Standalone => {
                web_app.and_then(|app| app.best_icon_url(SELECTOR_ICON_SIZE))
            }
            _ => None,
        };

        self.windows.insert(id, controller);
        self.selectors.insert(id, WindowSelector::new(id, kind, icon_url));
        self.switch_window(id);
        self.window_count += 1;
        id
    }

    /// Switch to a window.
    ///
    /// The manager only ever switches to IDs it created; an unknown ID is
    /// a programming error and is ignored outside debug builds.
    pub fn switch_window(&mut self, id: u32) {
        if !self.windows.contains_key(&id) {
            debug_assert!(false, "switch to unknown window {}", id);
            error!(id, "switch requested for unknown window");
            return;
        }

        // Hide the current window.
        if let Some(current) = self.current_window {
            if let Some(window) = self.windows.get_mut(&current) {
                window.hide();
            }
            if let Some(selector) = self.selectors.get_mut(&current) {
                selector.deselect();
            }
        }

        // Signal transitions to and from the home screen, edges only. The
        // very first switch (home window creation at startup) has no
        // previous window and is not a transition.
        let had_current = self.current_window.is_some();
        let was_home = self.current_window == Some(HOME_WINDOW_ID);
        if id == HOME_WINDOW_ID && had_current && !was_home {
            self.signals.push_back(ShellSignal::GoingHome);
        } else if was_home && id != HOME_WINDOW_ID {
            self.signals.push_back(ShellSignal::LeavingHome);
        }

        self.current_window = Some(id);

        // Show the selected window.
        if let Some(window) = self.windows.get_mut(&id) {
            window.show();
        }
        if let Some(selector) = self.selectors.get_mut(&id) {
            selector.select();
        }
    }

    /// Close a window.
    ///
    /// The home window is not closable through this path, and closing an
    /// unknown ID is a silent no-op. If the closed window was current, the
    /// highest remaining ID becomes current.
    pub fn close_window(&mut self, id: u32) {
        if id == HOME_WINDOW_ID {
            warn!("refusing to close the home window");
            return;
        }
        if self.windows.remove(&id).is_none() {
            return;
        }
        self.selectors.remove(&id);

        if self.current_window == Some(id) {
            // Promote the highest remaining ID. The closed window is still
            // recorded as current here, so switching away from it detects
            // the home transition edge like any other switch.
            match self.windows.keys().next_back().copied() {
                Some(highest) => self.switch_window(highest),
                None => self.current_window = None,
            }
        }
    }

    /// Close a tab, cascading to a window close when it was the last one.
    pub fn close_tab(&mut self, window_id: u32, tab_id: u32) {
        let outcome = match self.windows.get_mut(&window_id) {
            Some(window) => window.close_tab(tab_id),
            None => return,
        };
        if outcome == TabCloseOutcome::WindowEmpty {
            self.close_window(window_id);
        }
    }

    /// Pump every window's surfaces, then act on the requests they
    /// bubbled up (e.g. a home screen icon opening an app window).
    pub fn pump(&mut self, registry: &AppRegistry) {
        let mut requests = Vec::new();
        for window in self.windows.values_mut() {
            requests.extend(window.pump());
        }
        for request in requests {
            match request {
                WindowRequest::OpenWindow { url, app_id } => {
                    self.handle_open_window(url.as_deref(), app_id.as_deref(), registry);
                }
            }
        }
    }

    /// Take all pending home transition signals, in order.
    pub fn drain_signals(&mut self) -> Vec<ShellSignal> {
        self.signals.drain(..).collect()
    }

    // === Accessors ===

    pub fn current_window(&self) -> Option<u32> {
        self.current_window
    }

    pub fn window(&self, id: u32) -> Option<&WindowController> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: u32) -> Option<&mut WindowController> {
        self.windows.get_mut(&id)
    }

    pub fn selector(&self, id: u32) -> Option<&WindowSelector> {
        self.selectors.get(&id)
    }

    /// Open window IDs in creation order.
    pub fn window_ids(&self) -> Vec<u32> {
        self.windows.keys().copied().collect()
    }

    pub fn window_len(&self) -> usize {
        self.windows.len()
    }
}
