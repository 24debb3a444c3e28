//! In-memory content surface.
//!
//! Models enough of an embedded browsing surface for the demo binary and
//! tests: a session history, visibility/activation flags, and a scripted
//! event queue. Pages "load" instantly; tests inject title, favicon and
//! manifest events through a [`SurfaceProbe`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{ContentSurface, SurfaceEvent, SurfaceFactory};

#[derive(Debug, Default)]
struct SurfaceState {
    history: Vec<String>,
    history_index: usize,
    visible: bool,
    active: bool,
    loading: bool,
    events: VecDeque<SurfaceEvent>,
}

impl SurfaceState {
    fn current_url(&self) -> Option<&str> {
        self.history.get(self.history_index).map(String::as_str)
    }

    fn emit_navigation(&mut self, url: String) {
        self.loading = true;
        self.events.push_back(SurfaceEvent::LoadStart);
        self.events.push_back(SurfaceEvent::LocationChanged {
            url,
            in_page: false,
        });
        self.loading = false;
        self.events.push_back(SurfaceEvent::LoadStop);
    }
}

/// Content surface backed by plain in-memory state.
pub struct HeadlessSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState::default())),
        }
    }

    /// A handle onto this surface's state, for inspection and for
    /// injecting page-originated events.
    pub fn probe(&self) -> SurfaceProbe {
        SurfaceProbe {
            state: Rc::clone(&self.state),
        }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSurface for HeadlessSurface {
    fn navigate(&mut self, url: &str) {
        let mut state = self.state.borrow_mut();
        // A navigation drops any forward history, like a real session.
        let index = state.history_index;
        if !state.history.is_empty() {
            state.history.truncate(index + 1);
        }
        state.history.push(url.to_string());
        state.history_index = state.history.len() - 1;
        state.emit_navigation(url.to_string());
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.loading {
            state.loading = false;
        }
        state.events.push_back(SurfaceEvent::LoadStop);
    }

    fn reload(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(url) = state.current_url().map(str::to_string) {
            state.emit_navigation(url);
        }
    }

    fn go_back(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.history_index > 0 {
            state.history_index -= 1;
            let url = state.current_url().unwrap_or_default().to_string();
            state.emit_navigation(url);
        }
    }

    fn go_forward(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.history_index + 1 < state.history.len() {
            state.history_index += 1;
            let url = state.current_url().unwrap_or_default().to_string();
            state.emit_navigation(url);
        }
    }

    fn can_go_back(&self) -> bool {
        self.state.borrow().history_index > 0
    }

    fn can_go_forward(&self) -> bool {
        let state = self.state.borrow();
        state.history_index + 1 < state.history.len()
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn set_active(&mut self, active: bool) {
        self.state.borrow_mut().active = active;
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }
}

/// Shared view onto a [`HeadlessSurface`]'s state.
#[derive(Clone)]
pub struct SurfaceProbe {
    state: Rc<RefCell<SurfaceState>>,
}

impl SurfaceProbe {
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    pub fn current_url(&self) -> Option<String> {
        self.state.borrow().current_url().map(str::to_string)
    }

    /// Queue an event as if the page had produced it.
    pub fn emit(&self, event: SurfaceEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    /// Queue an in-page (hash-only) location change.
    pub fn emit_in_page_navigation(&self, url: &str) {
        let mut state = self.state.borrow_mut();
        let index = state.history_index;
        if !state.history.is_empty() {
            state.history.truncate(index + 1);
        }
        state.history.push(url.to_string());
        state.history_index = state.history.len() - 1;
        state.events.push_back(SurfaceEvent::LocationChanged {
            url: url.to_string(),
            in_page: true,
        });
    }
}

/// Factory producing headless surfaces; keeps a probe for every surface it
/// creates so callers can observe and script them afterwards.
#[derive(Default)]
pub struct HeadlessSurfaceFactory {
    probes: RefCell<Vec<SurfaceProbe>>,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes for every surface created so far, in creation order.
    pub fn probes(&self) -> Vec<SurfaceProbe> {
        self.probes.borrow().clone()
    }

    /// Probe for the most recently created surface.
    pub fn last_probe(&self) -> Option<SurfaceProbe> {
        self.probes.borrow().last().cloned()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create_surface(&self) -> Box<dyn ContentSurface> {
        let surface = HeadlessSurface::new();
        self.probes.borrow_mut().push(surface.probe());
        Box::new(surface)
    }
}
