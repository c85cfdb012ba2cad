//! Filter error helpers
//!
//! Unknown or mistyped columns are programming errors in a view definition,
//! never user input, so they surface as [`DashboardError::Filter`].

use crate::error::{DashboardError, Result};

pub fn filter_err<T>(message: impl AsRef<str>) -> Result<T> {
    Err(DashboardError::filter(message.as_ref()))
}

/// The constrained column does not exist in the table
pub fn column_not_found<T>(column_name: &str) -> Result<T> {
    filter_err(format!("Column '{column_name}' not found"))
}

/// The constrained column cannot be compared with the literal
pub fn column_type_error<T>(column_name: &str, expected_type: &str) -> Result<T> {
    filter_err(format!("Column '{column_name}' is not a {expected_type} column"))
}

/// Turn Arrow kernel errors into filter errors with context
pub trait FilterResultExt<T> {
    fn with_filter_context(self, message: impl AsRef<str>) -> Result<T>;
}

impl<T, E: std::error::Error> FilterResultExt<T> for std::result::Result<T, E> {
    fn with_filter_context(self, message: impl AsRef<str>) -> Result<T> {
        self.map_err(|e| DashboardError::filter(format!("{}: {e}", message.as_ref())))
    }
}
