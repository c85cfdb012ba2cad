//! Filtering capabilities for the mortality tables
//!
//! This module provides an expression-based filtering system for Arrow
//! record batches, and the optional equality constraints the dashboard
//! dropdowns bind to.

pub mod constraint;
pub mod core;
pub mod error;
pub mod expr;

pub use constraint::{Constraint, constraints_to_expr, is_all_sentinel};
pub use self::core::{BatchFilter, filter_record_batch};
pub use expr::{Expr, ExpressionFilter, evaluate_expr};

use arrow::record_batch::RecordBatch;

use crate::error::Result;

/// Apply a set of constraints to a batch, returning a fresh filtered batch
pub fn apply_constraints(batch: &RecordBatch, constraints: &[Constraint]) -> Result<RecordBatch> {
    ExpressionFilter::new(constraints_to_expr(constraints)).filter(batch)
}
