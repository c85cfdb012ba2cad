//! A Rust library and server for exploring Colombian mortality statistics of
//! 2019: lenient CSV loading into Arrow, equality filtering, grouped sums with
//! top/bottom selection, and an axum dashboard rendering Plotly figures.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod options;
pub mod schema;
pub mod server;
pub mod utils;
pub mod views;

// Re-export the most common types for easier use
// Core types
pub use config::{DashboardConfig, DataFiles, RankingConfig, ServerConfig};
pub use dataset::DashboardData;
pub use error::{DashboardError, Result};
pub use schema::TableKind;

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Filtering and aggregation
pub use aggregate::{AggregateQuery, GroupedRow, GroupedTable, Selection, group_sum};
pub use filter::{Constraint, Expr, apply_constraints, evaluate_expr, filter_record_batch};

// Views and HTTP
pub use loader::{Boundaries, load_boundaries, load_tables};
pub use options::{FilterKind, FilterOptions};
pub use server::{AppState, router};
pub use views::{ViewBody, ViewFilters, ViewKind, ViewResult, build_view};
