//! App registry.
//!
//! In-memory index of installed web apps, keyed by their stable identity
//! and backed by the persisted app store. On first run (an empty store)
//! the registry bootstraps from a bundled default app list and persists
//! each entry.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::database::store::AppStore;
use crate::services::manifest_processor;
use crate::types::errors::StoreError;
use crate::types::web_app::WebApp;

/// Default apps installed on first run.
const DEFAULT_APPS_JSON: &str = include_str!("../../resources/default-apps.json");

/// Trait defining registry lookups.
pub trait AppRegistryTrait {
    fn get_all(&self) -> &HashMap<String, WebApp>;
    fn get_by_id(&self, id: &str) -> Option<&WebApp>;
    fn reload(&mut self, store: &AppStore) -> Result<(), StoreError>;
}

/// In-memory web app index backed by the app store.
pub struct AppRegistry {
    apps: HashMap<String, WebApp>,
}

impl AppRegistry {
    /// Loads every persisted app document and indexes it by ID.
    ///
    /// If the store holds no documents, the bundled default app list is
    /// parsed, persisted and indexed instead. Lookups are only valid once
    /// this returns.
    pub fn initialize(store: &AppStore) -> Result<Self, StoreError> {
        let mut docs = store.get_all_documents()?;

        if docs.is_empty() {
            info!("app store empty, installing default apps");
            docs = Self::bootstrap_defaults(store)?;
        }

        let mut apps = HashMap::new();
        for app in docs {
            apps.insert(app.id().to_string(), app);
        }
        Ok(Self { apps })
    }

    /// Parses the bundled default manifests and persists each as a new
    /// document. Entries that cannot be parsed are skipped with a
    /// diagnostic rather than failing the bootstrap.
    fn bootstrap_defaults(store: &AppStore) -> Result<Vec<WebApp>, StoreError> {
        let manifests: Vec<Value> = serde_json::from_str(DEFAULT_APPS_JSON)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        let mut apps = Vec::new();
        for raw in &manifests {
            // Default manifests carry absolute URLs, so the start URL
            // doubles as both manifest URL and document URL.
            let start_url = match raw
                .get("start_url")
                .and_then(Value::as_str)
                .and_then(|s| Url::parse(s).ok())
            {
                Some(url) => url,
                None => {
                    warn!("default app entry without an absolute start_url, skipping");
                    continue;
                }
            };
            let manifest = manifest_processor::parse(raw, &start_url, &start_url);
            let app = WebApp::from_manifest(manifest);
            store.put_document(&app)?;
            apps.push(app);
        }
        Ok(apps)
    }

    /// Apps ordered for the home screen: by frecency, highest first, with
    /// the ID as tie-breaker so the order is stable.
    pub fn ordered_for_home_screen(&self) -> Vec<&WebApp> {
        let mut apps: Vec<&WebApp> = self.apps.values().collect();
        apps.sort_by(|a, b| {
            b.frecency
                .partial_cmp(&a.frecency)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id().cmp(b.id()))
        });
        apps
    }

    /// Number of indexed apps.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl AppRegistryTrait for AppRegistry {
    /// Current map of app IDs to apps.
    fn get_all(&self) -> &HashMap<String, WebApp> {
        &self.apps
    }

    /// Look up one app by its stable ID.
    fn get_by_id(&self, id: &str) -> Option<&WebApp> {
        self.apps.get(id)
    }

    /// Re-reads the document set from the store, replacing the index.
    /// Called after a (debounced) store change notification.
    fn reload(&mut self, store: &AppStore) -> Result<(), StoreError> {
        let docs = store.get_all_documents()?;
        self.apps = docs
            .into_iter()
            .map(|app| (app.id().to_string(), app))
            .collect();
        Ok(())
    }
}
