//! Persistence module split across logical submodules.

mod connection;
mod groups;
mod students;

pub use connection::{apply_schema, open_database};
pub use groups::{fetch_groups, group_exists, insert_group};
pub(crate) use students::group_students;
pub use students::{
    change_student_group, delete_student, delete_students_in_group, fetch_student_by_nia,
    fetch_students, fetch_students_in_group, insert_student, rename_student,
};
