//! Binary entry point that glues the SQLite-backed record store to the
//! console menu. Summarizing the bootstrapping pipeline here keeps the intent
//! obvious when revisiting the code: we bring up logging, resolve the file
//! locations, open the database, and drive the menu loop until the operator
//! exits.
use tracing::info;
use tracing_subscriber::EnvFilter;

use student_registry::{open_database, run_menu, Config};

/// Initialize logging and persistence, then hand control to the menu.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal instead of crashing
/// silently.
fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::resolve()?;
    info!(db = %config.db_path.display(), "opening student registry");

    let conn = open_database(&config.db_path)?;
    run_menu(&conn, &config)?;

    Ok(())
}
