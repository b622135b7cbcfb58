//! Tests for the SQLite record store
//!
//! These tests verify:
//! - Insert/fetch round-trips for groups and students
//! - Uniqueness and referential-integrity conflicts
//! - Listing by group, including the no-match failures
//! - Rename, regroup, and delete behavior on hits and misses

use chrono::NaiveDate;
use rusqlite::Connection;
use student_registry::db::{
    change_student_group, delete_student, delete_students_in_group, fetch_groups,
    fetch_student_by_nia, fetch_students, fetch_students_in_group, group_exists, insert_group,
    insert_student, rename_student,
};
use student_registry::{apply_schema, Gender, GroupName, NewStudent, RegistryError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    apply_schema(&conn).unwrap();
    conn
}

fn group(name: &str) -> GroupName {
    GroupName::parse(name).unwrap()
}

fn sample_student(nia: i64, group_name: &str) -> NewStudent {
    NewStudent {
        nia: Some(nia),
        name: "ANA".to_string(),
        surname: "GARCIA LUNA".to_string(),
        gender: Gender::Female,
        birth_date: NaiveDate::from_ymd_opt(2004, 5, 11).unwrap(),
        cycle: "DAM".to_string(),
        course: "2".to_string(),
        group: group(group_name),
    }
}

// =============================================================================
// Group Tests
// =============================================================================

#[test]
fn test_insert_group_and_fetch_sorted() {
    let conn = setup_store();

    insert_group(&conn, group("c")).unwrap();
    insert_group(&conn, group("A")).unwrap();
    insert_group(&conn, group("b")).unwrap();

    let names: Vec<String> = fetch_groups(&conn)
        .unwrap()
        .iter()
        .map(|g| g.to_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn test_duplicate_group_in_any_case_is_a_conflict() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();

    let err = insert_group(&conn, group("a")).unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(_)), "got {err:?}");
}

#[test]
fn test_group_name_must_be_a_single_letter() {
    assert!(GroupName::parse("AB").is_err());
    assert!(GroupName::parse("1").is_err());
    assert!(GroupName::parse("").is_err());
    assert_eq!(group(" b ").as_char(), 'B');
}

#[test]
fn test_group_exists_reflects_inserts() {
    let conn = setup_store();
    assert!(!group_exists(&conn, group("A")).unwrap());

    insert_group(&conn, group("A")).unwrap();
    assert!(group_exists(&conn, group("A")).unwrap());
}

// =============================================================================
// Student Insert/Fetch Tests
// =============================================================================

#[test]
fn test_insert_student_then_fetch_by_nia_returns_equal_record() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();

    let inserted = insert_student(&conn, &sample_student(1001, "A")).unwrap();
    let fetched = fetch_student_by_nia(&conn, 1001).unwrap();

    assert_eq!(inserted, fetched);
    assert_eq!(fetched.nia, 1001);
    assert_eq!(fetched.name, "ANA");
    assert_eq!(fetched.gender, Gender::Female);
    assert_eq!(
        fetched.birth_date,
        NaiveDate::from_ymd_opt(2004, 5, 11).unwrap()
    );
    assert_eq!(fetched.group, group("A"));
}

#[test]
fn test_insert_student_without_nia_gets_one_assigned() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();

    let mut first = sample_student(0, "A");
    first.nia = None;
    let mut second = sample_student(0, "A");
    second.nia = None;
    second.name = "LUCIA".to_string();

    let first = insert_student(&conn, &first).unwrap();
    let second = insert_student(&conn, &second).unwrap();

    assert!(second.nia > first.nia);
    assert_eq!(fetch_student_by_nia(&conn, second.nia).unwrap().name, "LUCIA");
}

#[test]
fn test_duplicate_nia_is_a_conflict() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    let err = insert_student(&conn, &sample_student(1001, "A")).unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(_)), "got {err:?}");
}

#[test]
fn test_insert_student_into_unknown_group_is_a_conflict() {
    let conn = setup_store();

    let err = insert_student(&conn, &sample_student(1001, "Z")).unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(_)), "got {err:?}");
    assert!(fetch_students(&conn).unwrap().is_empty());
}

#[test]
fn test_fetch_students_is_ordered_by_nia() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1003, "A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();
    insert_student(&conn, &sample_student(1002, "A")).unwrap();

    let nias: Vec<i64> = fetch_students(&conn).unwrap().iter().map(|s| s.nia).collect();
    assert_eq!(nias, vec![1001, 1002, 1003]);
}

#[test]
fn test_fetch_missing_student_is_not_found() {
    let conn = setup_store();

    let err = fetch_student_by_nia(&conn, 42).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
}

// =============================================================================
// Listing By Group Tests
// =============================================================================

#[test]
fn test_fetch_students_in_group_returns_only_members() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_group(&conn, group("B")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();
    insert_student(&conn, &sample_student(1002, "B")).unwrap();
    insert_student(&conn, &sample_student(1003, "A")).unwrap();

    let members = fetch_students_in_group(&conn, group("A")).unwrap();
    let nias: Vec<i64> = members.iter().map(|s| s.nia).collect();
    assert_eq!(nias, vec![1001, 1003]);
}

#[test]
fn test_fetch_students_in_missing_group_is_not_found() {
    let conn = setup_store();

    let err = fetch_students_in_group(&conn, group("Z")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
}

#[test]
fn test_fetch_students_in_empty_group_is_not_found() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();

    let err = fetch_students_in_group(&conn, group("A")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
}

// =============================================================================
// Rename Tests
// =============================================================================

#[test]
fn test_rename_student_stores_uppercase_name() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    rename_student(&conn, 1001, "  lucia  ").unwrap();
    assert_eq!(fetch_student_by_nia(&conn, 1001).unwrap().name, "LUCIA");
}

#[test]
fn test_rename_missing_student_leaves_store_unchanged() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    let err = rename_student(&conn, 9999, "LUCIA").unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
    assert_eq!(fetch_student_by_nia(&conn, 1001).unwrap().name, "ANA");
}

#[test]
fn test_rename_to_blank_name_is_rejected() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    let err = rename_student(&conn, 1001, "   ").unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)), "got {err:?}");
    assert_eq!(fetch_student_by_nia(&conn, 1001).unwrap().name, "ANA");
}

// =============================================================================
// Change Group Tests
// =============================================================================

#[test]
fn test_change_student_group_moves_the_row() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_group(&conn, group("B")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    change_student_group(&conn, 1001, group("B")).unwrap();
    assert_eq!(fetch_student_by_nia(&conn, 1001).unwrap().group, group("B"));
}

#[test]
fn test_change_group_to_missing_target_leaves_student_in_place() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    let err = change_student_group(&conn, 1001, group("Z")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
    assert_eq!(fetch_student_by_nia(&conn, 1001).unwrap().group, group("A"));
}

#[test]
fn test_change_group_for_missing_student_is_not_found() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();

    let err = change_student_group(&conn, 42, group("A")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_student_removes_the_row() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();

    delete_student(&conn, 1001).unwrap();
    assert!(fetch_student_by_nia(&conn, 1001).is_err());
}

#[test]
fn test_delete_missing_student_is_not_found() {
    let conn = setup_store();

    let err = delete_student(&conn, 42).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
}

#[test]
fn test_delete_students_in_group_reports_the_count() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_group(&conn, group("B")).unwrap();
    insert_student(&conn, &sample_student(1001, "A")).unwrap();
    insert_student(&conn, &sample_student(1002, "A")).unwrap();
    insert_student(&conn, &sample_student(1003, "B")).unwrap();

    let deleted = delete_students_in_group(&conn, group("A")).unwrap();
    assert_eq!(deleted, 2);

    let remaining: Vec<i64> = fetch_students(&conn).unwrap().iter().map(|s| s.nia).collect();
    assert_eq!(remaining, vec![1003]);
}

#[test]
fn test_delete_students_in_group_with_no_matches_changes_nothing() {
    let conn = setup_store();
    insert_group(&conn, group("A")).unwrap();
    insert_group(&conn, group("B")).unwrap();
    insert_student(&conn, &sample_student(1001, "B")).unwrap();

    let err = delete_students_in_group(&conn, group("A")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
    assert_eq!(fetch_students(&conn).unwrap().len(), 1);
}

#[test]
fn test_delete_students_in_missing_group_is_not_found() {
    let conn = setup_store();

    let err = delete_students_in_group(&conn, group("Z")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got {err:?}");
}
