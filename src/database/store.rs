//! App document store.
//!
//! Persists [`WebApp`] documents as JSON rows in SQLite and notifies
//! subscribers when the document set changes. The change signal carries no
//! payload — consumers re-query, typically behind a
//! [`Debouncer`](crate::services::debounce::Debouncer) to coalesce bursts.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use tracing::debug;

use crate::database::connection::Database;
use crate::types::errors::StoreError;
use crate::types::web_app::WebApp;

type ChangeListener = Box<dyn Fn() + Send>;

/// Document store for installed web apps.
pub struct AppStore {
    db: Arc<Database>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl AppStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Loads every persisted app document.
    pub fn get_all_documents(&self) -> Result<Vec<WebApp>, StoreError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare("SELECT doc FROM apps ORDER BY id")
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let mut docs = Vec::new();
        for row in rows {
            let json = row.map_err(|e| StoreError::DatabaseError(e.to_string()))?;
            let app: WebApp = serde_json::from_str(&json)
                .map_err(|e| StoreError::SerializationError(e.to_string()))?;
            docs.push(app);
        }
        Ok(docs)
    }

    /// Loads one app document by its stable ID.
    pub fn get_document(&self, id: &str) -> Result<WebApp, StoreError> {
        let conn = self.db.connection();
        let result = conn.query_row("SELECT doc FROM apps WHERE id = ?1", params![id], |row| {
            row.get::<_, String>(0)
        });

        match result {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::SerializationError(e.to_string())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(StoreError::DatabaseError(e.to_string())),
        }
    }

    /// Inserts or replaces an app document and notifies subscribers.
    pub fn put_document(&self, app: &WebApp) -> Result<(), StoreError> {
        let json = serde_json::to_string(app)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO apps (id, doc, updated_at) VALUES (?1, ?2, ?3)",
                params![app.id(), json, Self::now()],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        debug!(id = app.id(), "saved app document");
        self.notify_change();
        Ok(())
    }

    /// Removes an app document and notifies subscribers. Removing an
    /// unknown ID is a no-op.
    pub fn remove_document(&self, id: &str) -> Result<(), StoreError> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM apps WHERE id = ?1", params![id])
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        if removed > 0 {
            self.notify_change();
        }
        Ok(())
    }

    /// Number of persisted documents.
    pub fn document_count(&self) -> Result<usize, StoreError> {
        let conn = self.db.connection();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(count as usize)
    }

    /// Registers a change listener. The signal carries no payload;
    /// listeners re-query the store.
    pub fn subscribe(&self, listener: ChangeListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }

    fn notify_change(&self) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener();
            }
        }
    }
}
