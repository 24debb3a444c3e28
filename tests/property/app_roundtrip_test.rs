//! Property-based tests for web app identity and persistence.
//!
//! A web app's identity is derived deterministically from its start URL's
//! hostname plus any declared scope, and must survive a store round trip
//! unchanged, since it doubles as the persistence key.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use url::Url;
use webshell::database::{AppStore, Database};
use webshell::services::manifest_processor;
use webshell::types::web_app::WebApp;

fn arb_hostname() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,10}", "[a-z]{2,4}").prop_map(|(label, tld)| format!("{label}.{tld}"))
}

fn arb_scope() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z]{1,8}".prop_map(|seg| format!("/{seg}/")))
}

fn build_app(hostname: &str, scope: Option<&str>, name: &str, frecency: f64) -> WebApp {
    let start_url = format!("https://{hostname}/");
    let url = Url::parse(&start_url).unwrap();
    let mut raw = json!({ "name": name, "start_url": start_url });
    if let Some(scope) = scope {
        raw["scope"] = json!(scope);
    }
    let mut app = WebApp::from_manifest(manifest_processor::parse(&raw, &url, &url));
    app.frecency = frecency;
    app
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn app_id_is_hostname_plus_scope(
        hostname in arb_hostname(),
        scope in arb_scope(),
    ) {
        let app = build_app(&hostname, scope.as_deref(), "App", 0.0);
        let expected = match &scope {
            Some(scope) => format!("{hostname}{scope}"),
            None => hostname.clone(),
        };
        prop_assert_eq!(app.id(), expected.as_str());
    }

    #[test]
    fn app_id_stable_across_re_parse(
        hostname in arb_hostname(),
        scope in arb_scope(),
        name_a in "[A-Za-z ]{1,20}",
        name_b in "[A-Za-z ]{1,20}",
    ) {
        // Re-fetching a manifest may change cosmetic fields; as long as
        // origin and scope are unchanged the identity must not move.
        let first = build_app(&hostname, scope.as_deref(), &name_a, 0.0);
        let second = build_app(&hostname, scope.as_deref(), &name_b, 3.0);
        prop_assert_eq!(first.id(), second.id());
    }

    #[test]
    fn persisted_app_round_trips_identity(
        hostname in arb_hostname(),
        scope in arb_scope(),
        name in "[A-Za-z ]{1,20}",
        frecency in 0.0f64..100.0,
    ) {
        let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
        let store = AppStore::new(db);

        let original = build_app(&hostname, scope.as_deref(), &name, frecency);
        store.put_document(&original).unwrap();

        let loaded = store.get_document(original.id()).unwrap();
        prop_assert_eq!(loaded.id(), original.id());
        prop_assert_eq!(&loaded.name, &original.name);
        prop_assert_eq!(&loaded.start_url, &original.start_url);
        prop_assert_eq!(&loaded.scope, &original.scope);
        prop_assert_eq!(loaded.frecency, original.frecency);

        // A second round trip through the full document set agrees too.
        let all = store.get_all_documents().unwrap();
        prop_assert!(all.iter().any(|app| app.id() == original.id()));
    }
}
