//! WebShell — a multi-window desktop web shell with tabbed browsing and a
//! home screen of pinned web apps.
//!
//! Entry point: with the `gui` feature this starts the wry/tao shell
//! chrome. Without it, runs a console demo driving the core against the
//! headless surface.

#[cfg(feature = "gui")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    webshell::ui::shell_app::run();
}

#[cfg(not(feature = "gui"))]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                WebShell v{} — Demo Mode                   ║", env!("CARGO_PKG_VERSION"));
    println!("║     Multi-window web shell with a pinned-app home screen     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_manifest_processing();
    demo_icon_selection();
    demo_app_registry();
    demo_windows_and_tabs();
    demo_manifest_fetch_rules();

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Core demonstrated. Build with --features gui for the shell.");
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

#[cfg(not(feature = "gui"))]
fn demo_manifest_processing() {
    use url::Url;
    use webshell::services::manifest_processor;

    section("Manifest Processing");

    let raw = serde_json::json!({
        "name": "Example App",
        "short_name": "Example",
        "start_url": "/app/",
        "display": "standalone",
        "theme_color": "#336699",
        "icons": [
            { "src": "icons/app-192.png", "sizes": "192x192", "type": "image/png" },
            { "src": "icons/app-mono.png", "sizes": "any", "purpose": "monochrome" }
        ]
    });
    let manifest_url = Url::parse("https://example.com/manifest.json").unwrap();
    let document_url = Url::parse("https://example.com/").unwrap();

    let manifest = manifest_processor::parse(&raw, &manifest_url, &document_url);
    println!("  Parsed \"{}\"", manifest.name.as_deref().unwrap_or("?"));
    println!("  start_url: {}", manifest.start_url);
    println!("  display:   {:?}", manifest.display);
    println!("  icons:     {}", manifest.icons.len());
    println!("  ✓ ManifestProcessor OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_icon_selection() {
    use url::Url;
    use webshell::services::{icon_selector, manifest_processor};

    section("Icon Selection");

    let raw = serde_json::json!({
        "icons": [
            { "src": "s.png", "sizes": "16x16" },
            { "src": "m.png", "sizes": "48x48" },
            { "src": "l.png", "sizes": "96x96" }
        ]
    });
    let base = Url::parse("https://example.com/manifest.json").unwrap();
    let manifest = manifest_processor::parse(&raw, &base, &base);

    for target in [16, 32, 64, 200] {
        let best = icon_selector::select_best_icon(&manifest.icons, target);
        println!(
            "  target {:>3}px -> {}",
            target,
            best.map(|u| u.to_string()).unwrap_or_else(|| "none".into())
        );
    }
    println!("  ✓ IconSelector OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_app_registry() {
    use std::sync::Arc;
    use webshell::database::{AppStore, Database};
    use webshell::services::app_registry::AppRegistry;

    section("App Registry");

    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let store = Arc::new(AppStore::new(db));
    let registry = AppRegistry::initialize(&store).expect("registry init");

    println!("  Bootstrapped {} default apps:", registry.len());
    for app in registry.ordered_for_home_screen() {
        println!(
            "    {} ({})",
            app.shortest_name().unwrap_or("?"),
            app.id()
        );
    }
    println!("  ✓ AppRegistry OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_windows_and_tabs() {
    use std::rc::Rc;
    use webshell::app::Shell;
    use webshell::services::manifest_fetcher::HttpManifestFetcher;
    use webshell::surface::headless::HeadlessSurfaceFactory;
    use webshell::types::events::ShellEvent;

    section("Windows and Tabs");

    let factory = Rc::new(HeadlessSurfaceFactory::new());
    let mut shell = Shell::new_in_memory(factory, Box::new(HttpManifestFetcher::new()))
        .expect("shell init");

    println!("  Home window current: {:?}", shell.window_manager.current_window());

    shell.handle_event(ShellEvent::OpenWindow {
        url: Some("https://example.com/".to_string()),
        app_id: None,
    });
    let browser_id = shell.window_manager.current_window().unwrap();
    println!("  Opened browser window {}", browser_id);

    {
        let window = shell.window_manager.window_mut(browser_id).unwrap();
        window.create_tab(Some("https://example.org/"));
        window.create_tab(None);
        println!("  Tabs: {:?}, selected {:?}", window.tab_ids(), window.current_tab());
    }

    shell.handle_event(ShellEvent::SwitchWindow { id: 0 });
    shell.handle_event(ShellEvent::CloseWindow { id: browser_id });
    println!("  Signals: {:?}", shell.drain_signals());
    println!("  Windows remaining: {:?}", shell.window_manager.window_ids());
    println!("  ✓ WindowManager OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_manifest_fetch_rules() {
    use webshell::services::manifest_fetcher::{build_request, CredentialsMode};

    section("Manifest Fetch Rules");

    let ok = build_request(
        "https://example.com/page",
        Some("/manifest.json"),
        Some("use-credentials"),
    )
    .expect("request builds");
    println!("  Resolved: {} ({:?})", ok.url, ok.credentials);
    assert_eq!(ok.credentials, CredentialsMode::Include);

    let missing = build_request("https://example.com/page", None, None);
    println!("  Missing link -> {}", missing.unwrap_err());
    println!("  ✓ ManifestFetcher rules OK");
    println!();
}
