//! Terminal reporting for fatal startup errors

use colored::*;
use queuekeeper_core::{QueueKeeperError, ValidationErrors};

/// Print every schema violation as a numbered block on stderr
pub fn print_validation_report(errors: &ValidationErrors) {
    eprintln!("{}", "Invalid configuration".red().bold());
    eprint!("{}", errors.report());
    eprintln!(
        "{}",
        "Fix the listed fields (see docs/configuration.md) and restart.".dimmed()
    );
}

/// Print a fatal load error on stderr
pub fn print_load_error(error: &QueueKeeperError) {
    match error.validation_errors() {
        Some(errors) => print_validation_report(errors),
        None => eprintln!("{} {}", "Cannot load configuration:".red().bold(), error),
    }
}
