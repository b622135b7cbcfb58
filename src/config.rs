//! Runtime configuration: where the database and the fixed-name export files
//! live. Invocation is argument-less, so everything is resolved here once at
//! startup.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-registry";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "students.sqlite";
/// Environment variable overriding the database location.
const DB_PATH_ENV: &str = "STUDENT_REGISTRY_DB";
/// Fixed name of the flat text export in the working directory.
const TEXT_FILE_NAME: &str = "students.txt";
/// Fixed name of the XML export in the working directory.
const XML_FILE_NAME: &str = "groups.xml";

/// Resolved paths for one run of the program.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Flat text export/import file.
    pub text_file: PathBuf,
    /// XML export/import file.
    pub xml_file: PathBuf,
}

impl Config {
    /// Resolve the configuration. The database defaults to a home-relative
    /// location and honors the `STUDENT_REGISTRY_DB` override; the export
    /// files keep their fixed names in the working directory.
    pub fn resolve() -> Result<Self> {
        let db_path = match env::var_os(DB_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        Ok(Self {
            db_path,
            text_file: PathBuf::from(TEXT_FILE_NAME),
            xml_file: PathBuf::from(XML_FILE_NAME),
        })
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
