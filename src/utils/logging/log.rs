//! Log lines shared by loading and view computation

use std::path::Path;
use std::time::Duration;

/// Log that a file is about to be read
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Log a finished table load
///
/// # Arguments
/// * `operation` - Past-tense verb, e.g. "loaded"
/// * `path` - File the rows came from
/// * `rows` - Rows in the adapted table
/// * `elapsed` - Time spent reading and adapting
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => log::info!("{operation} {rows} rows from {} in {duration:.2?}", path.display()),
        None => log::info!("{operation} {rows} rows from {}", path.display()),
    }
}

/// Log a data problem that was recovered from
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message} ({})", path.display()),
        None => log::warn!("{message}"),
    }
}

/// Log the outcome of recomputing a view
pub fn log_view_computed(view: &str, groups: usize, deaths: i64, active_constraints: usize) {
    log::debug!("{view}: {groups} group(s), {deaths} death(s) after {active_constraints} active constraint(s)");
}
