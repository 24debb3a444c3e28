//! Schema migrations for the WebShell database.
//!
//! All statements are idempotent (`IF NOT EXISTS`) so running them on
//! every open is safe.

use rusqlite::Connection;

/// Runs all schema migrations.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    create_apps_table(conn)?;
    Ok(())
}

/// The app document table: one JSON document per installed web app, keyed
/// by the app's stable identity (hostname plus optional scope).
fn create_apps_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS apps (
            id TEXT PRIMARY KEY,
            doc TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_apps_updated_at ON apps(updated_at);",
    )
}
