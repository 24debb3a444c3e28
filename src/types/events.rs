/// Requests routed from the shell chrome to the window manager.
///
/// This is the sole coupling mechanism between the chrome and the
/// window/tab lifecycle: the UI translates clicks into these events and
/// the window manager consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Open a new window, optionally at a URL and/or for a known app.
    OpenWindow {
        url: Option<String>,
        app_id: Option<String>,
    },
    /// Switch to the window with the given ID.
    SwitchWindow { id: u32 },
    /// Close the window with the given ID.
    CloseWindow { id: u32 },
}

/// Edge-triggered signals emitted by the window manager.
///
/// Fired only on actual transitions to or away from the home screen, never
/// on repeated switches within the same state. Intended for the embedding
/// chrome to restyle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellSignal {
    GoingHome,
    LeavingHome,
}
