//! WebShell UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering:
//! - Windows: WebView2 (Chromium-based)
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! The shell chrome (window switcher, tab strip, URL bar, home screen) is
//! rendered as HTML/CSS/JS inside the WebView. Communication between the
//! Rust core and the JS chrome uses wry IPC.

pub mod shell_app;
