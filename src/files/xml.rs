//! XML documents of groups and their students. Export writes an indented
//! document with one `<group>` element per group and nested `<student>`
//! elements; import walks the same shape back, creating missing groups and
//! skipping records that fail validation or insertion.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use rusqlite::Connection;
use tracing::warn;

use crate::db::{fetch_groups, group_exists, group_students, insert_group, insert_student};
use crate::error::{RegistryError, Result};
use crate::files::ImportSummary;
use crate::models::{Gender, Group, GroupName, NewStudent, Student};

/// Write every group and its students to `path`, replacing any previous
/// document. Returns how many groups were written.
pub fn export_groups(conn: &Connection, path: &Path) -> Result<usize> {
    let groups = fetch_groups(conn)?;

    let file = File::create(path)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
    write_document(&mut writer, conn, &groups)?;
    writer.into_inner().flush()?;

    Ok(groups.len())
}

/// Write a single group and its students to `path`. Fails when the group
/// does not exist; a group without students still produces a document.
pub fn export_group(conn: &Connection, name: GroupName, path: &Path) -> Result<()> {
    if !group_exists(conn, name)? {
        return Err(RegistryError::not_found("group", name));
    }

    let file = File::create(path)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
    write_document(&mut writer, conn, &[Group { name }])?;
    writer.into_inner().flush()?;
    Ok(())
}

fn write_document<W: Write>(
    writer: &mut Writer<W>,
    conn: &Connection,
    groups: &[Group],
) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("groups")))?;

    for group in groups {
        let mut start = BytesStart::new("group");
        start.push_attribute(("name", group.name.to_string().as_str()));
        writer.write_event(Event::Start(start))?;

        for student in group_students(conn, group.name)? {
            write_student(writer, &student)?;
        }

        writer.write_event(Event::End(BytesEnd::new("group")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("groups")))?;
    Ok(())
}

fn write_student<W: Write>(writer: &mut Writer<W>, student: &Student) -> Result<()> {
    let mut start = BytesStart::new("student");
    start.push_attribute(("nia", student.nia.to_string().as_str()));
    writer.write_event(Event::Start(start))?;

    write_field(writer, "name", &student.name)?;
    write_field(writer, "surname", &student.surname)?;
    write_field(writer, "gender", student.gender.as_str())?;
    write_field(writer, "birth-date", &student.birth_date.to_string())?;
    write_field(writer, "cycle", &student.cycle)?;
    write_field(writer, "course", &student.course)?;

    writer.write_event(Event::End(BytesEnd::new("student")))?;
    Ok(())
}

fn write_field<W: Write>(writer: &mut Writer<W>, tag: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Read a group document and insert its contents. Groups are created when
/// missing and reused when present; a group or student element that fails
/// validation or insertion is counted as skipped and the walk continues. A
/// missing file fails the whole operation before the store is touched.
pub fn import_groups(conn: &Connection, path: &Path) -> Result<ImportSummary> {
    if !path.exists() {
        return Err(RegistryError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("XML file '{}' does not exist", path.display()),
        )));
    }

    let document = fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&document);
    reader.config_mut().trim_text(true);

    let mut summary = ImportSummary::default();
    let mut current_group: Option<GroupName> = None;
    let mut pending: Option<StudentElement> = None;
    let mut current_field: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.name().as_ref() {
                b"groups" => {}
                b"group" => current_group = register_group(conn, &start, &mut summary),
                b"student" => match StudentElement::from_start(&start) {
                    Ok(element) => pending = Some(element),
                    Err(err) => {
                        warn!(%err, "skipping student element");
                        summary.skipped += 1;
                        pending = None;
                    }
                },
                _ => {
                    if pending.is_some() {
                        current_field =
                            Some(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                        text.clear();
                    }
                }
            },
            Event::Empty(start) => match start.name().as_ref() {
                b"group" => {
                    register_group(conn, &start, &mut summary);
                }
                b"student" => match StudentElement::from_start(&start) {
                    Ok(element) => finish_student(conn, element, current_group, &mut summary),
                    Err(err) => {
                        warn!(%err, "skipping student element");
                        summary.skipped += 1;
                    }
                },
                _ => {
                    if let Some(element) = pending.as_mut() {
                        let field = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                        element.set(&field, String::new());
                    }
                }
            },
            Event::Text(value) => {
                if current_field.is_some() {
                    text.push_str(&value.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::End(end) => match end.name().as_ref() {
                b"groups" => {}
                b"group" => current_group = None,
                b"student" => {
                    if let Some(element) = pending.take() {
                        finish_student(conn, element, current_group, &mut summary);
                    }
                    current_field = None;
                }
                _ => {
                    if let (Some(field), Some(element)) = (current_field.take(), pending.as_mut())
                    {
                        element.set(&field, std::mem::take(&mut text));
                    }
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(summary)
}

/// Handle one `<group>` element: parse the name attribute and make sure the
/// group exists, creating it when missing. Returns the name so nested
/// students attach to it; on failure the group and everything inside it are
/// skipped.
fn register_group(
    conn: &Connection,
    start: &BytesStart<'_>,
    summary: &mut ImportSummary,
) -> Option<GroupName> {
    let outcome = group_name_from(start).and_then(|name| {
        let created = ensure_group(conn, name)?;
        Ok((name, created))
    });

    match outcome {
        Ok((name, created)) => {
            if created {
                summary.inserted += 1;
            }
            Some(name)
        }
        Err(err) => {
            warn!(%err, "skipping group element");
            summary.skipped += 1;
            None
        }
    }
}

fn group_name_from(start: &BytesStart<'_>) -> Result<GroupName> {
    match attribute(start, "name")? {
        Some(raw) => GroupName::parse(&raw),
        None => Err(RegistryError::Validation(
            "group element is missing its name attribute".into(),
        )),
    }
}

/// Create the group unless it already exists. Returns whether a row was
/// actually inserted.
fn ensure_group(conn: &Connection, name: GroupName) -> Result<bool> {
    if group_exists(conn, name)? {
        Ok(false)
    } else {
        insert_group(conn, name)?;
        Ok(true)
    }
}

/// Complete one `<student>` element: validate the collected fields and insert
/// the row under `group`. Failures are logged and counted, never fatal.
fn finish_student(
    conn: &Connection,
    element: StudentElement,
    group: Option<GroupName>,
    summary: &mut ImportSummary,
) {
    let outcome = match group {
        Some(group) => element
            .into_new_student(group)
            .and_then(|student| insert_student(conn, &student)),
        None => Err(RegistryError::Validation(
            "student element outside a usable group".into(),
        )),
    };

    match outcome {
        Ok(_) => summary.inserted += 1,
        Err(err) => {
            warn!(%err, "skipping student element");
            summary.skipped += 1;
        }
    }
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match start
        .try_get_attribute(name)
        .map_err(quick_xml::Error::from)?
    {
        Some(attr) => {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Accumulates the attribute and child-element values of one `<student>`
/// element until the closing tag, where they are validated together.
#[derive(Default)]
struct StudentElement {
    nia: Option<String>,
    name: Option<String>,
    surname: Option<String>,
    gender: Option<String>,
    birth_date: Option<String>,
    cycle: Option<String>,
    course: Option<String>,
}

impl StudentElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        Ok(Self {
            nia: attribute(start, "nia")?,
            ..Self::default()
        })
    }

    fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "surname" => self.surname = Some(value),
            "gender" => self.gender = Some(value),
            "birth-date" => self.birth_date = Some(value),
            "cycle" => self.cycle = Some(value),
            "course" => self.course = Some(value),
            _ => {}
        }
    }

    fn into_new_student(self, group: GroupName) -> Result<NewStudent> {
        let nia = match self.nia {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| RegistryError::Validation(format!("invalid NIA '{raw}'")))?,
            ),
            None => None,
        };
        let birth_date_raw = required("birth-date", self.birth_date)?;
        let birth_date = NaiveDate::parse_from_str(&birth_date_raw, "%Y-%m-%d").map_err(|_| {
            RegistryError::Validation(format!("invalid birth date '{birth_date_raw}'"))
        })?;

        Ok(NewStudent {
            nia,
            name: required("name", self.name)?,
            surname: required("surname", self.surname)?,
            gender: Gender::parse(&required("gender", self.gender)?)?,
            birth_date,
            cycle: required("cycle", self.cycle)?,
            course: required("course", self.course)?,
            group,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| {
        RegistryError::Validation(format!("student element is missing <{field}>"))
    })
}
