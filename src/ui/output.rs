//! Styled console output and the error reporter that separates expected
//! domain failures from faults.

use crossterm::style::Stylize;
use tracing::error;

use crate::error::RegistryError;

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn notice(message: &str) {
    println!("{}", message.yellow());
}

pub fn failure(message: &str) {
    println!("{}", message.red());
}

pub fn heading(message: &str) {
    println!("{}", message.bold());
}

/// Report an operation failure. Domain failures print tersely and move on;
/// faults also land in the log with full detail.
pub fn report(err: &RegistryError) {
    if err.is_domain() {
        failure(&err.to_string());
    } else {
        error!(%err, "operation failed");
        failure(&format!("Unexpected failure: {err}"));
    }
}
