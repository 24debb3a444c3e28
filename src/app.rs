//! Shell core for WebShell.
//!
//! The [`Shell`] is the single context object constructed at process
//! start. It owns the database, the app store and registry, the window
//! manager, and the manifest fetcher, and wires the debounced
//! store-change refresh. Nothing in the core is a global; everything
//! reaches collaborators through this struct.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::database::connection::Database;
use crate::database::store::AppStore;
use crate::managers::window_manager::WindowManager;
use crate::services::app_registry::{AppRegistry, AppRegistryTrait};
use crate::services::debounce::Debouncer;
use crate::services::manifest_fetcher::ManifestFetcherTrait;
use crate::services::manifest_processor;
use crate::surface::SurfaceFactory;
use crate::types::errors::{FetchError, InstallError};
use crate::types::events::{ShellEvent, ShellSignal};
use crate::types::web_app::WebApp;

/// Quiet interval for coalescing store change notifications.
const STORE_CHANGE_QUIET_INTERVAL: Duration = Duration::from_millis(100);

/// Central shell context holding all managers and services.
pub struct Shell {
    pub db: Arc<Database>,
    pub store: Arc<AppStore>,
    pub registry: AppRegistry,
    pub window_manager: WindowManager,
    fetcher: Box<dyn ManifestFetcherTrait>,
    store_dirty: Arc<AtomicBool>,
    refresh_debouncer: Debouncer,
}

impl Shell {
    /// Creates a shell over a database at the given path.
    pub fn new(
        db_path: &str,
        factory: Rc<dyn SurfaceFactory>,
        fetcher: Box<dyn ManifestFetcherTrait>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Self::with_database(db, factory, fetcher)
    }

    /// Creates a shell over an in-memory database, for the demo binary and
    /// tests.
    pub fn new_in_memory(
        factory: Rc<dyn SurfaceFactory>,
        fetcher: Box<dyn ManifestFetcherTrait>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Self::with_database(db, factory, fetcher)
    }

    fn with_database(
        db: Arc<Database>,
        factory: Rc<dyn SurfaceFactory>,
        fetcher: Box<dyn ManifestFetcherTrait>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let store = Arc::new(AppStore::new(db.clone()));

        // Change notifications only mark the registry dirty; the refresh
        // itself happens on tick, behind the debouncer.
        let store_dirty = Arc::new(AtomicBool::new(false));
        {
            let dirty = Arc::clone(&store_dirty);
            store.subscribe(Box::new(move || {
                dirty.store(true, Ordering::Relaxed);
            }));
        }

        let registry = AppRegistry::initialize(&store)
            .map_err(|e| format!("AppRegistry init failed: {}", e))?;
        info!(apps = registry.len(), "app registry initialized");

        let window_manager = WindowManager::start(factory);

        Ok(Self {
            db,
            store,
            registry,
            window_manager,
            fetcher,
            store_dirty,
            refresh_debouncer: Debouncer::new(STORE_CHANGE_QUIET_INTERVAL),
        })
    }

    /// Route a shell event to the window manager.
    pub fn handle_event(&mut self, event: ShellEvent) {
        self.window_manager.handle_event(event, &self.registry);
    }

    /// One cooperative turn: pump window surfaces and apply any due
    /// (debounced) registry refresh.
    pub fn tick(&mut self) {
        self.window_manager.pump(&self.registry);

        if self.store_dirty.swap(false, Ordering::Relaxed) {
            self.refresh_debouncer.signal();
        }
        if self.refresh_debouncer.poll() {
            if let Err(e) = self.registry.reload(&self.store) {
                warn!(error = %e, "app registry refresh failed");
            }
        }
    }

    /// Take pending home transition signals for the chrome.
    pub fn drain_signals(&mut self) -> Vec<ShellSignal> {
        self.window_manager.drain_signals()
    }

    /// Install the web app declared by a tab's current page.
    ///
    /// Fetches the page's manifest, processes it into a canonical form,
    /// and persists the resulting app. The registry picks the change up
    /// through the store's change notification. Returns the new app's
    /// stable ID.
    pub fn install_app_from_tab(
        &mut self,
        window_id: u32,
        tab_id: u32,
    ) -> Result<String, InstallError> {
        let tab = self
            .window_manager
            .window(window_id)
            .and_then(|window| window.tab(tab_id))
            .ok_or(InstallError::TabNotFound)?;

        let request = tab.manifest_fetch_request()?;
        let document_url = url::Url::parse(tab.document_url())
            .map_err(|e| FetchError::UrlResolution(e.to_string()))?;

        let raw = self.fetcher.fetch(&request)?;
        let manifest = manifest_processor::parse(&raw, &request.url, &document_url);
        let app = WebApp::from_manifest(manifest);
        let id = app.id().to_string();
        self.store.put_document(&app)?;

        info!(id = %id, "installed web app");
        Ok(id)
    }
}
