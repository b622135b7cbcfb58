//! The numbered menu loop. Each option maps to exactly one record-store or
//! file operation; failures become styled messages and the loop carries on
//! until the operator picks 0.

use rusqlite::Connection;

use crate::config::Config;
use crate::db::{
    change_student_group, delete_student, delete_students_in_group, fetch_groups, fetch_students,
    fetch_students_in_group, insert_group, insert_student, rename_student,
};
use crate::error::Result;
use crate::files::{
    export_group, export_groups, export_students, import_groups, import_students,
};
use crate::models::GroupName;
use crate::ui::{input, output};

const MENU: &str = "\
---- Student registry ------------------------------------------
 1. Insert a new student.
 2. Insert a new group.
 3. List all students with every attribute.
 4. Save all students to the text file.
 5. Load students from the text file.
 6. Rename a student by NIA.
 7. Delete a student by NIA.
 8. Delete all students in a group.
 9. Save every group and its students to the XML file.
10. Load groups from the XML file.
11. List the students of a group.
12. List all students (NIA and name only).
13. Move a student to another group.
14. Save a single group to the XML file.
 0. Exit.
----------------------------------------------------------------";

/// Run the menu until the operator picks option 0. Operation failures are
/// reported and never break the loop; only losing stdin or stdout ends it
/// early.
pub fn run_menu(conn: &Connection, config: &Config) -> Result<()> {
    loop {
        println!("\n{MENU}");
        let choice = input::prompt_line("Select an option: ")?;

        let option: u32 = match choice.parse() {
            Ok(option) => option,
            Err(_) => {
                output::failure("Enter a number between 0 and 14.");
                continue;
            }
        };

        if option == 0 {
            println!("Goodbye!");
            return Ok(());
        }

        if let Err(err) = dispatch(option, conn, config) {
            output::report(&err);
        }
    }
}

fn dispatch(option: u32, conn: &Connection, config: &Config) -> Result<()> {
    match option {
        1 => insert_student_flow(conn),
        2 => insert_group_flow(conn),
        3 => list_students_flow(conn, true),
        4 => export_text_flow(conn, config),
        5 => import_text_flow(conn, config),
        6 => rename_student_flow(conn),
        7 => delete_student_flow(conn),
        8 => delete_group_students_flow(conn),
        9 => export_xml_flow(conn, config),
        10 => import_xml_flow(conn, config),
        11 => list_group_flow(conn),
        12 => list_students_flow(conn, false),
        13 => change_group_flow(conn),
        14 => export_one_group_flow(conn, config),
        _ => {
            output::failure("Enter a number between 0 and 14.");
            Ok(())
        }
    }
}

fn insert_student_flow(conn: &Connection) -> Result<()> {
    let student = input::prompt_new_student()?;
    let inserted = insert_student(conn, &student)?;
    output::success(&format!("Student {} inserted.", inserted.nia));
    Ok(())
}

fn insert_group_flow(conn: &Connection) -> Result<()> {
    let name = input::prompt_group_name("Name of the new group (one letter): ")?;
    let group = insert_group(conn, name)?;
    output::success(&format!("Group {group} inserted."));
    Ok(())
}

fn list_students_flow(conn: &Connection, verbose: bool) -> Result<()> {
    let students = fetch_students(conn)?;
    if students.is_empty() {
        output::notice("No students registered.");
        return Ok(());
    }

    for student in &students {
        if verbose {
            println!("{student}");
        } else {
            println!("{}", student.summary());
        }
    }
    output::success(&format!("{} student(s) listed.", students.len()));
    Ok(())
}

fn export_text_flow(conn: &Connection, config: &Config) -> Result<()> {
    let count = export_students(conn, &config.text_file)?;
    output::success(&format!(
        "{} student(s) saved to {}.",
        count,
        config.text_file.display()
    ));
    Ok(())
}

fn import_text_flow(conn: &Connection, config: &Config) -> Result<()> {
    let summary = import_students(conn, &config.text_file)?;
    output::success(&format!(
        "Imported {} student(s) from {} ({} skipped).",
        summary.inserted,
        config.text_file.display(),
        summary.skipped
    ));
    Ok(())
}

fn rename_student_flow(conn: &Connection) -> Result<()> {
    let nia = input::prompt_nia("NIA of the student to rename: ")?;
    let new_name = input::prompt_line("New name: ")?;
    rename_student(conn, nia, &new_name)?;
    output::success("Student renamed.");
    Ok(())
}

fn delete_student_flow(conn: &Connection) -> Result<()> {
    let nia = input::prompt_nia("NIA of the student to delete: ")?;
    delete_student(conn, nia)?;
    output::success("Student deleted.");
    Ok(())
}

fn delete_group_students_flow(conn: &Connection) -> Result<()> {
    let Some(group) = prompt_existing_group(conn, "Group whose students will be deleted: ")?
    else {
        return Ok(());
    };

    let question = format!("Delete every student in group {group}? (y/N): ");
    if !input::confirm(&question)? {
        output::notice("Nothing deleted.");
        return Ok(());
    }

    let deleted = delete_students_in_group(conn, group)?;
    output::success(&format!("{deleted} student(s) deleted from group {group}."));
    Ok(())
}

fn export_xml_flow(conn: &Connection, config: &Config) -> Result<()> {
    let count = export_groups(conn, &config.xml_file)?;
    output::success(&format!(
        "{} group(s) saved to {}.",
        count,
        config.xml_file.display()
    ));
    Ok(())
}

fn import_xml_flow(conn: &Connection, config: &Config) -> Result<()> {
    let summary = import_groups(conn, &config.xml_file)?;
    output::success(&format!(
        "Imported {} record(s) from {} ({} skipped).",
        summary.inserted,
        config.xml_file.display(),
        summary.skipped
    ));
    Ok(())
}

fn list_group_flow(conn: &Connection) -> Result<()> {
    let Some(group) = prompt_existing_group(conn, "Group to list: ")? else {
        return Ok(());
    };

    let students = fetch_students_in_group(conn, group)?;
    output::heading(&format!("Students in group {group}:"));
    for student in &students {
        println!("{student}");
    }
    output::success(&format!("{} student(s) listed.", students.len()));
    Ok(())
}

fn change_group_flow(conn: &Connection) -> Result<()> {
    let nia = input::prompt_nia("NIA of the student to move: ")?;
    let Some(target) = prompt_existing_group(conn, "Target group: ")? else {
        return Ok(());
    };

    change_student_group(conn, nia, target)?;
    output::success(&format!("Student {nia} moved to group {target}."));
    Ok(())
}

fn export_one_group_flow(conn: &Connection, config: &Config) -> Result<()> {
    let Some(group) = prompt_existing_group(conn, "Group to save: ")? else {
        return Ok(());
    };

    export_group(conn, group, &config.xml_file)?;
    output::success(&format!(
        "Group {group} saved to {}.",
        config.xml_file.display()
    ));
    Ok(())
}

/// Show the registered groups, then prompt for one. Comes back with `None`
/// when no groups exist yet, which every group-scoped flow treats as a
/// reported no-op.
fn prompt_existing_group(conn: &Connection, prompt: &str) -> Result<Option<GroupName>> {
    let groups = fetch_groups(conn)?;
    if groups.is_empty() {
        output::notice("No groups registered yet.");
        return Ok(None);
    }

    let names = groups
        .iter()
        .map(|group| group.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    output::heading(&format!("Available groups: {names}"));

    let name = input::prompt_group_name(prompt)?;
    Ok(Some(name))
}
