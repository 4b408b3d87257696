use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".setlist-sequence";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "preferences.sqlite";

/// Open the preference database in the user's data directory, creating the
/// directory and schema when missing.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = data_dir()?.join(DB_FILE_NAME);
    ensure_schema_at(&db_path)
}

/// Same as [`ensure_schema`] for an explicit database path. Tests point this
/// at a temporary directory.
pub fn ensure_schema_at(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY NOT NULL,
            value INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create preferences table")?;

    Ok(conn)
}

/// Resolve the absolute path to the application data directory inside the
/// user's home. Logs and exports live next to the database.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
