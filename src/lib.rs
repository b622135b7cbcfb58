//! Core library surface for the student registry console application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target and the integration tests can drive the exact same record
//! operations. Keeping the glue logic documented makes it easy to recall why
//! each re-export exists when revisiting the project.
pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer. These are typically used
/// by `main.rs` to bring up the embedded SQLite store.
pub use db::{apply_schema, open_database};

/// The error channel shared by every record and file operation.
pub use error::{RegistryError, Result};

/// The domain types that other layers manipulate.
pub use models::{Gender, Group, GroupName, NewStudent, Student};

/// Resolved file locations and the interactive entry point.
pub use config::Config;
pub use ui::run_menu;
