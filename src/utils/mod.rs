//! Shared helpers that do not belong to a single table or view.

pub mod logging;
