//! WebView-based shell chrome using `wry` + `tao`.
//!
//! Architecture:
//! - The core (window manager, tabs, registry) runs headless; one real
//!   WebView renders whatever page the current window shows, like a
//!   projector pointed at the active surface.
//! - `with_initialization_script(PRELOAD_JS)` injects the manifest/favicon
//!   detector into every page before page scripts run.
//! - Internal pages (home screen, new tab) are served via the `shell://`
//!   custom protocol.
//! - IPC from JS → Rust via `window.ipc.postMessage()`; page findings are
//!   fed back into the current tab's surface so the core sees them through
//!   the same event channel as any other surface event.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tao::window::WindowBuilder;
use wry::WebViewBuilder;

use crate::app::Shell;
use crate::managers::window_controller::HOME_URL;
use crate::managers::window_manager::HOME_WINDOW_ID;
use crate::services::manifest_fetcher::HttpManifestFetcher;
use crate::surface::headless::{HeadlessSurfaceFactory, SurfaceProbe};
use crate::surface::{SurfaceEvent, SurfaceFactory};
use crate::types::events::{ShellEvent, ShellSignal};
use crate::types::tab::NEW_TAB_URL;
use crate::types::window::WindowKind;

#[derive(Debug)]
enum UserEvent {
    LoadUrl(String),
    EvalScript(String),
}

/// Home screen icon rendering target size.
const HOME_ICON_SIZE: u32 = 64;

const PRELOAD_JS: &str = include_str!("../../resources/preload.js");

struct ShellState {
    shell: Shell,
    factory: Rc<HeadlessSurfaceFactory>,
    /// Probe for each surface the core has created, keyed by window ID and
    /// (for browser windows) tab ID. Page findings from the real WebView
    /// are emitted into the current key's probe.
    probes: HashMap<(u32, Option<u32>), SurfaceProbe>,
    probe_count: usize,
}

impl ShellState {
    /// Pick up any surface created by the last core operation and key it
    /// by the window/tab it now belongs to. Core operations create at most
    /// one surface each.
    fn track_new_probe(&mut self) {
        let probes = self.factory.probes();
        if probes.len() <= self.probe_count {
            return;
        }
        self.probe_count = probes.len();
        if let Some(probe) = probes.last() {
            if let Some(key) = self.current_key() {
                self.probes.insert(key, probe.clone());
            }
        }
    }

    fn current_key(&self) -> Option<(u32, Option<u32>)> {
        let manager = &self.shell.window_manager;
        let window_id = manager.current_window()?;
        let tab = manager.window(window_id).and_then(|w| w.current_tab());
        Some((window_id, tab))
    }

    fn current_probe(&self) -> Option<&SurfaceProbe> {
        self.probes.get(&self.current_key()?)
    }

    /// URL the real WebView should display for the current window.
    fn current_page_target(&self) -> String {
        let manager = &self.shell.window_manager;
        let url = manager
            .current_window()
            .and_then(|id| manager.window(id))
            .and_then(|window| match window.kind() {
                WindowKind::Home => None,
                WindowKind::Browser => window
                    .current_tab()
                    .and_then(|tab| window.tab(tab))
                    .map(|tab| tab.document_url().to_string()),
                WindowKind::Standalone => window.current_url().map(str::to_string),
            });
        match url.as_deref() {
            None | Some(HOME_URL) => "shell://localhost/home".to_string(),
            Some(NEW_TAB_URL) => "shell://localhost/newtab".to_string(),
            Some(url) => url.to_string(),
        }
    }
}

// ─── Internal pages ───

fn internal_page(body: &str, js: &str) -> String {
    let mut html = String::with_capacity(body.len() + js.len() + 1024);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>");
    html.push_str(":root{--bg:#1c1c22;--fg:#e8e8ee;--muted:#8a8a96;--tile:#2a2a33;--accent:#4a90d9;--radius:12px;--font:-apple-system,BlinkMacSystemFont,\"Segoe UI\",sans-serif}");
    html.push_str("*{margin:0;padding:0;box-sizing:border-box}");
    html.push_str("body{font-family:var(--font);background:var(--bg);color:var(--fg);height:100vh;user-select:none}");
    html.push_str(".grid{display:flex;flex-wrap:wrap;gap:24px;justify-content:center;padding:64px 48px}");
    html.push_str(".tile{width:96px;text-align:center;cursor:pointer}");
    html.push_str(".tile img,.tile .ph{width:64px;height:64px;border-radius:var(--radius);background:var(--tile);margin:0 auto 8px;display:flex;align-items:center;justify-content:center;font-size:28px}");
    html.push_str(".tile .name{font-size:13px;color:var(--muted);overflow:hidden;text-overflow:ellipsis;white-space:nowrap}");
    html.push_str(".search{display:block;margin:96px auto 0;width:480px;max-width:80%;padding:12px 18px;font-size:15px;border:none;border-radius:var(--radius);background:var(--tile);color:var(--fg);outline:none}");
    html.push_str("</style></head><body>");
    html.push_str(body);
    html.push_str("<script>");
    html.push_str(js);
    html.push_str("</script></body></html>");
    html
}

/// The home screen: one tile per installed app, ordered by frecency.
fn home_html(state: &ShellState) -> String {
    let mut body = String::from("<div class=\"grid\">");
    for app in state.shell.registry.ordered_for_home_screen() {
        let name = app.shortest_name().unwrap_or(app.id());
        let icon = match app.best_icon_url(HOME_ICON_SIZE) {
            Some(url) => format!("<img src=\"{}\" alt=\"\">", url),
            None => format!(
                "<div class=\"ph\">{}</div>",
                name.chars().next().unwrap_or('?')
            ),
        };
        body.push_str(&format!(
            "<div class=\"tile\" data-app=\"{}\">{}<div class=\"name\">{}</div></div>",
            app.id(),
            icon,
            name
        ));
    }
    body.push_str("</div>");

    let js = r#"
document.querySelectorAll('.tile').forEach(function (t) {
  t.addEventListener('click', function () {
    window.ipc.postMessage(JSON.stringify({ type: 'open_app', id: t.dataset.app }));
  });
});
"#;
    internal_page(&body, js)
}

fn newtab_html() -> String {
    let body = r#"<input class="search" type="text" placeholder="Search or enter address" autofocus>"#;
    let js = r#"
var input = document.querySelector('.search');
input.addEventListener('keydown', function (e) {
  if (e.key === 'Enter' && e.target.value.trim()) {
    window.ipc.postMessage(JSON.stringify({ type: 'navigate', input: e.target.value.trim() }));
  }
});
setTimeout(function () { input.focus(); }, 100);
"#;
    internal_page(body, js)
}

// ─── IPC handler ───

fn handle_ipc(state: &mut ShellState, message: &str) -> Option<UserEvent> {
    let msg: serde_json::Value = serde_json::from_str(message).ok()?;
    let kind = msg.get("type")?.as_str()?;
    let str_field = |key: &str| msg.get(key).and_then(|v| v.as_str()).map(str::to_string);
    let id_field = |key: &str| msg.get(key).and_then(|v| v.as_u64()).map(|v| v as u32);

    match kind {
        "open_app" => {
            state.shell.handle_event(ShellEvent::OpenWindow {
                url: None,
                app_id: str_field("id"),
            });
            state.track_new_probe();
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "open_window" => {
            state.shell.handle_event(ShellEvent::OpenWindow {
                url: str_field("url"),
                app_id: None,
            });
            state.track_new_probe();
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "switch_window" => {
            if let Some(id) = id_field("id") {
                state.shell.handle_event(ShellEvent::SwitchWindow { id });
            }
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "close_window" => {
            if let Some(id) = id_field("id") {
                state.shell.handle_event(ShellEvent::CloseWindow { id });
            }
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "go_home" => {
            state.shell.handle_event(ShellEvent::SwitchWindow {
                id: HOME_WINDOW_ID,
            });
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "new_tab" => {
            let current = state.shell.window_manager.current_window()?;
            state
                .shell
                .window_manager
                .window_mut(current)?
                .create_tab(None);
            state.track_new_probe();
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "switch_tab" => {
            let current = state.shell.window_manager.current_window()?;
            if let Some(tab) = id_field("id") {
                state
                    .shell
                    .window_manager
                    .window_mut(current)?
                    .switch_tab(tab);
            }
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "close_tab" => {
            let current = state.shell.window_manager.current_window()?;
            if let Some(tab) = id_field("id") {
                state.shell.window_manager.close_tab(current, tab);
            }
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "navigate" => {
            let current = state.shell.window_manager.current_window()?;
            let window = state.shell.window_manager.window_mut(current)?;
            let tab = window.current_tab()?;
            if let Some(tab) = window.tab_mut(tab) {
                tab.set_url_bar_value(&str_field("input").unwrap_or_default());
                tab.submit_url_bar();
            }
            state.shell.tick();
            Some(UserEvent::LoadUrl(state.current_page_target()))
        }

        "install_app" => {
            let current = state.shell.window_manager.current_window()?;
            let tab = state
                .shell
                .window_manager
                .window(current)
                .and_then(|w| w.current_tab())?;
            match state.shell.install_app_from_tab(current, tab) {
                Ok(id) => Some(UserEvent::EvalScript(format!(
                    "console.log('installed {}')",
                    id
                ))),
                Err(e) => Some(UserEvent::EvalScript(format!(
                    "console.warn('install failed: {}')",
                    e
                ))),
            }
        }

        // Findings reported by the preload script. Routed into the current
        // tab's surface so the core processes them like any surface event.
        "manifestdetected" => {
            if let Some(probe) = state.current_probe() {
                probe.emit(SurfaceEvent::ManifestDetected {
                    href: str_field("href").unwrap_or_default(),
                    cross_origin: str_field("crossOrigin"),
                });
            }
            state.shell.tick();
            None
        }

        "favicondetected" => {
            if let Some(href) = str_field("href") {
                if let Some(probe) = state.current_probe() {
                    probe.emit(SurfaceEvent::FaviconChanged(href));
                }
            }
            state.shell.tick();
            None
        }

        _ => None,
    }
}

// ─── Main entry point ───

pub fn run() {
    let factory = Rc::new(HeadlessSurfaceFactory::new());
    let shell = Shell::new(
        "webshell.db",
        factory.clone() as Rc<dyn SurfaceFactory>,
        Box::new(HttpManifestFetcher::new()),
    )
    .expect("Failed to initialize WebShell");

    let mut state = ShellState {
        shell,
        factory,
        probes: HashMap::new(),
        probe_count: 0,
    };
    // The home window's surface was created during startup.
    state.track_new_probe();
    let state = Rc::new(RefCell::new(state));

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title("WebShell")
        .with_inner_size(tao::dpi::LogicalSize::new(1280.0, 800.0))
        .build(&event_loop)
        .expect("Failed to create window");

    let ipc_state = state.clone();
    let ipc_proxy = proxy.clone();
    let nw_state = state.clone();
    let nw_proxy = proxy.clone();
    let proto_state = state.clone();

    let builder = WebViewBuilder::new()
        .with_custom_protocol("shell".into(), move |_wv_id, request| {
            let html = match request.uri().path() {
                "/newtab" => newtab_html(),
                _ => home_html(&proto_state.borrow()),
            };
            wry::http::Response::builder()
                .header("Content-Type", "text/html; charset=utf-8")
                .body(html.into_bytes().into())
                .unwrap()
        })
        .with_initialization_script(PRELOAD_JS)
        .with_url("shell://localhost/home")
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let mut s = ipc_state.borrow_mut();
            if let Some(event) = handle_ipc(&mut s, msg.body().as_str()) {
                let _ = ipc_proxy.send_event(event);
            }
        })
        .with_new_window_req_handler(move |url, _features| {
            // A page asked for a new top-level window: browser windows open
            // a tab in place instead.
            let mut s = nw_state.borrow_mut();
            if let Some(probe) = s.current_probe() {
                probe.emit(SurfaceEvent::OpenWindowRequested {
                    url: Some(url),
                    app_id: None,
                });
            }
            s.shell.tick();
            s.track_new_probe();
            let _ = nw_proxy.send_event(UserEvent::LoadUrl(s.current_page_target()));
            wry::NewWindowResponse::Deny
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().expect("Failed to get GTK vbox");
        builder.build_gtk(vbox).expect("Failed to create WebView")
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window).expect("Failed to create WebView");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::LoadUrl(url) => {
                    let _ = webview.load_url(&url);
                }
                UserEvent::EvalScript(js) => {
                    let _ = webview.evaluate_script(&js);
                }
            },

            Event::MainEventsCleared => {
                let mut s = state.borrow_mut();
                s.shell.tick();
                for signal in s.shell.drain_signals() {
                    let js = match signal {
                        ShellSignal::GoingHome => "document.body.classList.add('home')",
                        ShellSignal::LeavingHome => "document.body.classList.remove('home')",
                    };
                    let _ = webview.evaluate_script(js);
                }
            }

            _ => {}
        }
    });
}
