//! Domain models that mirror the SQLite schema and get passed between the
//! menu, the record store, and the file import/export paths. The types stay
//! light-weight data holders; the parsing constructors are the single place
//! where the one-letter group rule and the gender vocabulary are enforced.

use std::fmt;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::{RegistryError, Result};

/// Single-letter group identifier, always uppercase. Invalid input never
/// constructs a value, so every `GroupName` in the process satisfies the
/// schema's one-letter constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupName(char);

impl GroupName {
    /// Parse an operator- or file-supplied group name. Accepts exactly one
    /// alphabetic character, any case, and normalizes it to uppercase.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => {
                Ok(Self(letter.to_ascii_uppercase()))
            }
            _ => Err(RegistryError::Validation(format!(
                "group name must be a single letter, got '{trimmed}'"
            ))),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for GroupName {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for GroupName {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text).map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// Gender vocabulary stored as lowercase text in the `students` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    /// Parse case-insensitively; single letters and full words are accepted.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "f" | "female" => Ok(Self::Female),
            "m" | "male" => Ok(Self::Male),
            "o" | "other" => Ok(Self::Other),
            other => Err(RegistryError::Validation(format!(
                "gender must be female, male or other, got '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Gender {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text).map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// A persisted student row. `nia` is the primary key and never changes after
/// creation; `name` and `group` mutate only through the dedicated rename and
/// change-group operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub nia: i64,
    pub name: String,
    /// Both surnames in one field.
    pub surname: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    /// Academic cycle, e.g. "DAM".
    pub cycle: String,
    /// Course within the cycle, e.g. "2".
    pub course: String,
    /// Name of the group this student belongs to. Always references an
    /// existing `groups` row.
    pub group: GroupName,
}

impl Student {
    /// Short `nia  name` form used by the brief listing.
    pub fn summary(&self) -> String {
        format!("{}  {}", self.nia, self.name)
    }
}

impl fmt::Display for Student {
    /// One-line record with every attribute, used by the verbose listing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {} {}  {}  {}  {}/{}  group {}",
            self.nia,
            self.name,
            self.surname,
            self.gender,
            self.birth_date,
            self.cycle,
            self.course,
            self.group
        )
    }
}

/// Payload for an insert. `nia: None` lets the store assign the next free
/// identifier, which is how text-file imports (whose format carries no NIA)
/// create rows.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub nia: Option<i64>,
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub cycle: String,
    pub course: String,
    pub group: GroupName,
}

/// A persisted group row. Groups own students by name reference; the
/// relationship lives entirely in `students.group_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub name: GroupName,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_normalizes_case() {
        let name = GroupName::parse(" b ").unwrap();
        assert_eq!(name.as_char(), 'B');
        assert_eq!(name.to_string(), "B");
    }

    #[test]
    fn group_name_rejects_bad_input() {
        assert!(GroupName::parse("").is_err());
        assert!(GroupName::parse("AB").is_err());
        assert!(GroupName::parse("7").is_err());
        assert!(GroupName::parse(" ").is_err());
    }

    #[test]
    fn gender_parses_letters_and_words() {
        assert_eq!(Gender::parse("F").unwrap(), Gender::Female);
        assert_eq!(Gender::parse("male").unwrap(), Gender::Male);
        assert_eq!(Gender::parse("OTHER").unwrap(), Gender::Other);
        assert!(Gender::parse("x").is_err());
    }

    #[test]
    fn student_summary_is_nia_and_name() {
        let student = Student {
            nia: 1001,
            name: "ANA".into(),
            surname: "GARCIA LUNA".into(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(2004, 5, 11).unwrap(),
            cycle: "DAM".into(),
            course: "2".into(),
            group: GroupName::parse("a").unwrap(),
        };
        assert_eq!(student.summary(), "1001  ANA");
        assert!(student.to_string().contains("group A"));
    }
}
