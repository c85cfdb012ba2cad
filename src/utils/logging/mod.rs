//! Logging utilities for output and progress tracking
//!
//! This module provides utilities for logging and progress tracking while the
//! dashboard tables are loaded.

pub mod log;
pub mod progress;

pub use self::log::{log_operation_complete, log_operation_start, log_view_computed, log_warning};
pub use self::progress::{create_main_progress_bar, finish_progress_bar};
