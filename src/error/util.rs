//! File-system checks that name the offending path and what it was needed for

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{DashboardError, Result};

/// Open an input file, reporting `purpose` alongside the path on failure
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(DashboardError::io(
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found, needed for {purpose}"),
            ),
            path,
        ));
    }

    if !path.is_file() {
        return Err(DashboardError::io(
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a file, expected a file for {purpose}"),
            ),
            path,
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "permission denied - check file permissions".to_string(),
            _ => format!("failed to open file for {purpose}: {e}"),
        };
        DashboardError::io(io::Error::new(e.kind(), context), path)
    })
}

/// The data directory must exist and be listable
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(DashboardError::io(
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found, needed for {purpose}"),
            ),
            path,
        ));
    }

    if !path.is_dir() {
        return Err(DashboardError::io(
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a directory, expected a directory for {purpose}"),
            ),
            path,
        ));
    }

    fs::read_dir(path).map_err(|e| DashboardError::io(e, path))?;
    Ok(())
}
