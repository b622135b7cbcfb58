//! File snapshots of the record store: the flat text listing of students and
//! the XML documents of groups.

mod text;
mod xml;

pub use text::{export_students, import_students};
pub use xml::{export_group, export_groups, import_groups};

/// Outcome of a bulk import: how many records landed in the store and how
/// many had to be skipped. Skip reasons are logged as warnings as they
/// happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}
