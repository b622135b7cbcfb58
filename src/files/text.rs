//! Flat text snapshot of the student table: one semicolon-delimited line per
//! student with the fields in fixed order and no header row. Import reads the
//! identical layout, skipping lines that fail to parse or insert.

use std::io;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::{fetch_students, insert_student};
use crate::error::{RegistryError, Result};
use crate::files::ImportSummary;
use crate::models::{Gender, GroupName, NewStudent, Student};

/// One line of the snapshot: name;surname;gender;birth_date;cycle;course;group.
/// Values stay as plain text here so a bad field surfaces as a validation
/// failure through the domain parsers rather than a deserialization error.
#[derive(Debug, Serialize, Deserialize)]
struct TextRecord {
    name: String,
    surname: String,
    gender: String,
    birth_date: String,
    cycle: String,
    course: String,
    group: String,
}

impl From<&Student> for TextRecord {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            surname: student.surname.clone(),
            gender: student.gender.to_string(),
            birth_date: student.birth_date.to_string(),
            cycle: student.cycle.clone(),
            course: student.course.clone(),
            group: student.group.to_string(),
        }
    }
}

impl TextRecord {
    /// Convert a parsed line into an insert payload. The snapshot carries no
    /// NIA, so the store assigns one.
    fn into_new_student(self) -> Result<NewStudent> {
        let birth_date = NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d").map_err(|_| {
            RegistryError::Validation(format!("invalid birth date '{}'", self.birth_date))
        })?;

        Ok(NewStudent {
            nia: None,
            name: self.name,
            surname: self.surname,
            gender: Gender::parse(&self.gender)?,
            birth_date,
            cycle: self.cycle,
            course: self.course,
            group: GroupName::parse(&self.group)?,
        })
    }
}

/// Write every student to `path`, replacing any previous snapshot. Returns
/// how many lines were written.
pub fn export_students(conn: &Connection, path: &Path) -> Result<usize> {
    let students = fetch_students(conn)?;

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;
    for student in &students {
        writer.serialize(TextRecord::from(student))?;
    }
    writer.flush()?;

    Ok(students.len())
}

/// Read the snapshot back and insert each line as a new student. A line that
/// fails to parse or insert is counted as skipped and the import moves on; a
/// missing file fails the whole operation before the store is touched.
pub fn import_students(conn: &Connection, path: &Path) -> Result<ImportSummary> {
    if !path.exists() {
        return Err(RegistryError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("text file '{}' does not exist", path.display()),
        )));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut summary = ImportSummary::default();
    let mut record = StringRecord::new();
    loop {
        let line = reader.position().line();
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let outcome = record
                    .deserialize::<TextRecord>(None)
                    .map_err(RegistryError::from)
                    .and_then(TextRecord::into_new_student)
                    .and_then(|student| insert_student(conn, &student));

                match outcome {
                    Ok(_) => summary.inserted += 1,
                    Err(err) => {
                        warn!(line, %err, "skipping student record");
                        summary.skipped += 1;
                    }
                }
            }
            Err(err) => {
                warn!(line, %err, "skipping student record");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}
