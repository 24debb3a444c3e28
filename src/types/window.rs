use serde::{Deserialize, Serialize};

/// The kinds of window the shell can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// The home screen. A singleton with a reserved ID, created at startup.
    Home,
    /// Tabbed browser chrome.
    Browser,
    /// A single web app in its own window with a title bar.
    Standalone,
}
