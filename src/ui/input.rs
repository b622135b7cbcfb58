//! Blocking stdin prompts used by the menu flows. Each helper trims the raw
//! line; parse failures come back as validation errors so the dispatching
//! flow reports them and drops back to the menu.

use std::io::{self, Write};

use chrono::NaiveDate;

use crate::error::{RegistryError, Result};
use crate::models::{Gender, GroupName, NewStudent};

/// Print `prompt`, flush, and read one trimmed line from stdin.
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Err(RegistryError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "standard input closed",
        )));
    }

    Ok(input.trim().to_string())
}

/// Prompt for a NIA; anything non-numeric is a validation failure.
pub fn prompt_nia(prompt: &str) -> Result<i64> {
    let raw = prompt_line(prompt)?;
    raw.parse()
        .map_err(|_| RegistryError::Validation(format!("'{raw}' is not a valid NIA")))
}

/// Prompt for a one-letter group name.
pub fn prompt_group_name(prompt: &str) -> Result<GroupName> {
    let raw = prompt_line(prompt)?;
    GroupName::parse(&raw)
}

/// Yes/no confirmation; only an explicit `y` or `yes` proceeds.
pub fn confirm(prompt: &str) -> Result<bool> {
    let raw = prompt_line(prompt)?;
    Ok(matches!(raw.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Interactive form gathering a full student record. Names and cycle are
/// stored uppercase; the NIA is typed in by the operator.
pub fn prompt_new_student() -> Result<NewStudent> {
    let nia = prompt_nia("NIA: ")?;
    let name = prompt_required("Name: ")?.to_uppercase();
    let surname = prompt_required("Surname(s): ")?.to_uppercase();
    let gender = Gender::parse(&prompt_line("Gender (female/male/other): ")?)?;
    let birth_date = prompt_birth_date("Birth date (YYYY-MM-DD): ")?;
    let cycle = prompt_required("Cycle: ")?.to_uppercase();
    let course = prompt_required("Course: ")?;
    let group = prompt_group_name("Group (one letter): ")?;

    Ok(NewStudent {
        nia: Some(nia),
        name,
        surname,
        gender,
        birth_date,
        cycle,
        course,
        group,
    })
}

fn prompt_birth_date(prompt: &str) -> Result<NaiveDate> {
    let raw = prompt_line(prompt)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        RegistryError::Validation(format!("'{raw}' is not a valid date (YYYY-MM-DD)"))
    })
}

fn prompt_required(prompt: &str) -> Result<String> {
    let raw = prompt_line(prompt)?;
    if raw.is_empty() {
        return Err(RegistryError::Validation("a value is required here".into()));
    }
    Ok(raw)
}
