use rusqlite::{params, Connection, Error as SqlError, ErrorCode, Row};

use crate::db::groups::group_exists;
use crate::error::{RegistryError, Result};
use crate::models::{GroupName, NewStudent, Student};

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        nia: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        gender: row.get(3)?,
        birth_date: row.get(4)?,
        cycle: row.get(5)?,
        course: row.get(6)?,
        group: row.get(7)?,
    })
}

/// Insert a student row and return the stored record. With `nia: None` the
/// database assigns the next free identifier, which is read back through
/// `last_insert_rowid`. The group reference is checked up front so a dangling
/// reference reads as a conflict instead of a raw constraint failure.
pub fn insert_student(conn: &Connection, student: &NewStudent) -> Result<Student> {
    if !group_exists(conn, student.group)? {
        return Err(RegistryError::Conflict(format!(
            "group '{}' does not exist",
            student.group
        )));
    }

    conn.execute(
        "INSERT INTO students (nia, name, surname, gender, birth_date, cycle, course, group_name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            student.nia,
            student.name,
            student.surname,
            student.gender,
            student.birth_date,
            student.cycle,
            student.course,
            student.group,
        ],
    )
    .map_err(|err| map_duplicate_nia(err, student.nia))?;

    Ok(Student {
        nia: conn.last_insert_rowid(),
        name: student.name.clone(),
        surname: student.surname.clone(),
        gender: student.gender,
        birth_date: student.birth_date,
        cycle: student.cycle.clone(),
        course: student.course.clone(),
        group: student.group,
    })
}

/// Retrieve every student ordered by NIA.
pub fn fetch_students(conn: &Connection) -> Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT nia, name, surname, gender, birth_date, cycle, course, group_name
         FROM students ORDER BY nia",
    )?;
    let students = stmt
        .query_map([], student_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(students)
}

/// Fetch a single student by primary key.
pub fn fetch_student_by_nia(conn: &Connection, nia: i64) -> Result<Student> {
    let mut stmt = conn.prepare(
        "SELECT nia, name, surname, gender, birth_date, cycle, course, group_name
         FROM students WHERE nia = ?1",
    )?;
    stmt.query_row(params![nia], student_from_row)
        .map_err(|err| match err {
            SqlError::QueryReturnedNoRows => RegistryError::not_found("student", nia),
            other => other.into(),
        })
}

/// Bare select of one group's students, empty result allowed. The listing
/// operation and the XML exporter both build on this.
pub(crate) fn group_students(conn: &Connection, group: GroupName) -> Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT nia, name, surname, gender, birth_date, cycle, course, group_name
         FROM students WHERE group_name = ?1 ORDER BY nia",
    )?;
    let students = stmt
        .query_map(params![group], student_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(students)
}

/// The students of one group. Fails when the group does not exist and also
/// when it exists but matches nobody, so the caller always has rows to show
/// on success.
pub fn fetch_students_in_group(conn: &Connection, group: GroupName) -> Result<Vec<Student>> {
    if !group_exists(conn, group)? {
        return Err(RegistryError::not_found("group", group));
    }

    let students = group_students(conn, group)?;
    if students.is_empty() {
        return Err(RegistryError::not_found("students in group", group));
    }

    Ok(students)
}

/// Update a student's name. The new name is trimmed, must not be empty, and
/// is stored uppercase like interactively entered names.
pub fn rename_student(conn: &Connection, nia: i64, new_name: &str) -> Result<()> {
    let normalized = new_name.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(RegistryError::Validation(
            "the new name cannot be empty".into(),
        ));
    }

    let updated = conn.execute(
        "UPDATE students SET name = ?1 WHERE nia = ?2",
        params![normalized, nia],
    )?;

    if updated == 0 {
        Err(RegistryError::not_found("student", nia))
    } else {
        Ok(())
    }
}

/// Move a student to another group. The target is checked first so the
/// student row stays untouched when it does not exist.
pub fn change_student_group(conn: &Connection, nia: i64, target: GroupName) -> Result<()> {
    if !group_exists(conn, target)? {
        return Err(RegistryError::not_found("group", target));
    }

    let updated = conn.execute(
        "UPDATE students SET group_name = ?1 WHERE nia = ?2",
        params![target, nia],
    )?;

    if updated == 0 {
        Err(RegistryError::not_found("student", nia))
    } else {
        Ok(())
    }
}

/// Delete a student by primary key.
pub fn delete_student(conn: &Connection, nia: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM students WHERE nia = ?1", params![nia])?;

    if deleted == 0 {
        Err(RegistryError::not_found("student", nia))
    } else {
        Ok(())
    }
}

/// Delete every student in a group, returning how many rows went away. Fails
/// without touching the store when the group does not exist or has no
/// students.
pub fn delete_students_in_group(conn: &Connection, group: GroupName) -> Result<usize> {
    if !group_exists(conn, group)? {
        return Err(RegistryError::not_found("group", group));
    }

    let deleted = conn.execute(
        "DELETE FROM students WHERE group_name = ?1",
        params![group],
    )?;

    if deleted == 0 {
        Err(RegistryError::not_found("students in group", group))
    } else {
        Ok(deleted)
    }
}

/// Coerce the primary-key violation on `students.nia` into a conflict; any
/// other SQLite error passes through untouched.
fn map_duplicate_nia(err: SqlError, nia: Option<i64>) -> RegistryError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        match nia {
            Some(nia) => {
                RegistryError::Conflict(format!("a student with NIA {nia} already exists"))
            }
            None => RegistryError::Conflict("student violates a storage constraint".into()),
        }
    } else {
        err.into()
    }
}
