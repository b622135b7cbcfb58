use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::error::{RegistryError, Result};
use crate::models::{Group, GroupName};

/// Insert a new group row. The name has already passed the one-letter parse
/// and is stored uppercase, so a duplicate in any original case collides here
/// and is reported as a conflict.
pub fn insert_group(conn: &Connection, name: GroupName) -> Result<Group> {
    conn.execute("INSERT INTO groups (name) VALUES (?1)", params![name])
        .map_err(|err| map_duplicate_group(err, name))?;

    Ok(Group { name })
}

/// Retrieve every group ordered by name. Also serves as the listing shown
/// before group-scoped prompts.
pub fn fetch_groups(conn: &Connection) -> Result<Vec<Group>> {
    let mut stmt = conn.prepare("SELECT name FROM groups ORDER BY name")?;
    let groups = stmt
        .query_map([], |row| Ok(Group { name: row.get(0)? }))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(groups)
}

/// Whether a group with this name exists.
pub fn group_exists(conn: &Connection, name: GroupName) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM groups WHERE name = ?1")?;
    Ok(stmt.exists(params![name])?)
}

/// Coerce the uniqueness violation on `groups.name` into a conflict carrying
/// a readable message; every other SQLite error passes through untouched.
fn map_duplicate_group(err: SqlError, name: GroupName) -> RegistryError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        RegistryError::Conflict(format!("group '{name}' already exists"))
    } else {
        err.into()
    }
}
