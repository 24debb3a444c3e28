//! Unit tests for the app registry and its first-run bootstrap.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use webshell::database::{AppStore, Database};
use webshell::services::app_registry::{AppRegistry, AppRegistryTrait};
use webshell::services::manifest_processor;
use webshell::types::web_app::WebApp;

fn store() -> Arc<AppStore> {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    Arc::new(AppStore::new(db))
}

fn sample_app(start_url: &str) -> WebApp {
    let url = Url::parse(start_url).unwrap();
    let raw = json!({ "name": "Sample", "start_url": start_url });
    WebApp::from_manifest(manifest_processor::parse(&raw, &url, &url))
}

#[test]
fn test_empty_store_bootstraps_default_apps() {
    let store = store();
    assert_eq!(store.document_count().unwrap(), 0);

    let registry = AppRegistry::initialize(&store).expect("registry init");

    assert!(!registry.is_empty());
    // Every bootstrapped app was also persisted.
    assert_eq!(store.document_count().unwrap(), registry.len());
}

#[test]
fn test_bootstrap_includes_known_default() {
    let store = store();
    let registry = AppRegistry::initialize(&store).expect("registry init");

    let app = registry
        .get_by_id("duckduckgo.com")
        .expect("default search app present");
    assert_eq!(app.shortest_name(), Some("DuckDuckGo"));
    assert_eq!(app.start_url.as_str(), "https://duckduckgo.com/");
}

#[test]
fn test_non_empty_store_skips_bootstrap() {
    let store = store();
    let app = sample_app("https://apps.example.com/");
    store.put_document(&app).unwrap();

    let registry = AppRegistry::initialize(&store).expect("registry init");

    // Only the persisted app is indexed; no defaults were installed.
    assert_eq!(registry.len(), 1);
    assert!(registry.get_by_id("apps.example.com").is_some());
    assert!(registry.get_by_id("duckduckgo.com").is_none());
}

#[test]
fn test_get_by_id_unknown_yields_none() {
    let store = store();
    let registry = AppRegistry::initialize(&store).expect("registry init");
    assert!(registry.get_by_id("nowhere.invalid").is_none());
}

#[test]
fn test_get_all_keyed_by_stable_id() {
    let store = store();
    let registry = AppRegistry::initialize(&store).expect("registry init");

    for (id, app) in registry.get_all() {
        assert_eq!(id, app.id());
    }
}

#[test]
fn test_reload_picks_up_later_store_change() {
    let store = store();
    let mut registry = AppRegistry::initialize(&store).expect("registry init");
    let before = registry.len();

    let app = sample_app("https://late.example.com/");
    store.put_document(&app).unwrap();
    assert_eq!(registry.len(), before, "index unchanged until reload");

    registry.reload(&store).unwrap();
    assert_eq!(registry.len(), before + 1);
    assert!(registry.get_by_id("late.example.com").is_some());
}

#[test]
fn test_home_screen_order_by_frecency_then_id() {
    let store = store();

    let mut frequent = sample_app("https://zzz.example.com/");
    frequent.frecency = 5.0;
    store.put_document(&frequent).unwrap();
    store.put_document(&sample_app("https://bbb.example.com/")).unwrap();
    store.put_document(&sample_app("https://aaa.example.com/")).unwrap();

    let registry = AppRegistry::initialize(&store).expect("registry init");
    let ordered: Vec<&str> = registry
        .ordered_for_home_screen()
        .iter()
        .map(|app| app.id())
        .collect();

    // Highest frecency first; equal frecency ordered by ID for stability.
    assert_eq!(
        ordered,
        vec!["zzz.example.com", "aaa.example.com", "bbb.example.com"]
    );
}

#[test]
fn test_frecency_survives_persistence() {
    let store = store();
    let mut app = sample_app("https://ranked.example.com/");
    app.frecency = 2.5;
    store.put_document(&app).unwrap();

    let registry = AppRegistry::initialize(&store).expect("registry init");
    let loaded = registry.get_by_id("ranked.example.com").unwrap();
    assert_eq!(loaded.frecency, 2.5);
}
