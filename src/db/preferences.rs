use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Set once the one-time drag hint has been shown.
pub const DRAG_HELPER_SEEN: &str = "has_seen_drag_helper";

/// Read a boolean preference. Unknown keys read as `false`.
pub fn get_flag(conn: &Connection, key: &str) -> Result<bool> {
    let value: Option<i64> = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("failed to read preference")?;
    Ok(value.unwrap_or(0) != 0)
}

/// Store a boolean preference, replacing any earlier value.
pub fn set_flag(conn: &Connection, key: &str, value: bool) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value as i64],
    )
    .context("failed to store preference")?;
    Ok(())
}

pub fn has_seen_drag_helper(conn: &Connection) -> Result<bool> {
    get_flag(conn, DRAG_HELPER_SEEN)
}

pub fn mark_drag_helper_seen(conn: &Connection) -> Result<()> {
    set_flag(conn, DRAG_HELPER_SEEN, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema_at;

    #[test]
    fn flags_default_to_false_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.sqlite");

        {
            let conn = ensure_schema_at(&path).unwrap();
            assert!(!has_seen_drag_helper(&conn).unwrap());
            mark_drag_helper_seen(&conn).unwrap();
            assert!(has_seen_drag_helper(&conn).unwrap());
        }

        let conn = ensure_schema_at(&path).unwrap();
        assert!(has_seen_drag_helper(&conn).unwrap());
    }

    #[test]
    fn set_flag_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let conn = ensure_schema_at(&dir.path().join("prefs.sqlite")).unwrap();
        set_flag(&conn, "example", true).unwrap();
        set_flag(&conn, "example", false).unwrap();
        assert!(!get_flag(&conn, "example").unwrap());
    }
}
