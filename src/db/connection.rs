use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open the database file (creating parent directories on first run), enable
/// foreign keys, and apply the schema. The returned connection is the store
/// handle for the rest of the process; dropping it closes the database.
pub fn open_database(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Enable referential integrity and create the two tables. Split out from
/// [`open_database`] so tests can run against `Connection::open_in_memory`.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS groups (
            name TEXT PRIMARY KEY CHECK (length(name) = 1)
        )",
        [],
    )
    .context("failed to create groups table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            nia        INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            surname    TEXT NOT NULL,
            gender     TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            cycle      TEXT NOT NULL,
            course     TEXT NOT NULL,
            group_name TEXT NOT NULL REFERENCES groups(name)
        )",
        [],
    )
    .context("failed to create students table")?;

    Ok(())
}
