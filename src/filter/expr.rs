//! Predicate expressions over table columns
//!
//! Only what the dashboard dropdowns need: equality with a literal and
//! conjunction. Evaluation goes through Arrow's vectorized comparison kernels.

use arrow::array::{Array, BooleanArray, StringArray};
use arrow::compute::and;
use arrow::compute::kernels::cmp::eq;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::filter::error::{FilterResultExt, column_not_found, column_type_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `column == value` on a string column
    Eq(String, String),
    And(Vec<Expr>),
    /// Matches every row
    AlwaysTrue,
}

impl Expr {
    #[must_use]
    pub fn eq_str(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// Conjunction with `AlwaysTrue` operands dropped
    ///
    /// No operands left gives `AlwaysTrue`; a single one is returned as is.
    #[must_use]
    pub fn all(mut exprs: Vec<Expr>) -> Self {
        exprs.retain(|e| *e != Self::AlwaysTrue);
        match exprs.len() {
            0 => Self::AlwaysTrue,
            1 => exprs.swap_remove(0),
            _ => Self::And(exprs),
        }
    }
}

/// Row mask of `expr` over `batch`; null cells never match
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),
        Expr::Eq(column, value) => {
            let Some(array) = batch.column_by_name(column) else {
                return column_not_found(column);
            };
            let Some(strings) = array.as_any().downcast_ref::<StringArray>() else {
                return column_type_error(column, "string");
            };
            eq(strings, &StringArray::new_scalar(value))
                .with_filter_context(format!("Failed to compare column '{column}'"))
        }
        Expr::And(exprs) => exprs.iter().try_fold(
            BooleanArray::from(vec![true; batch.num_rows()]),
            |acc, expr| {
                let mask = evaluate_expr(batch, expr)?;
                and(&acc, &mask).with_filter_context("Failed to combine row masks")
            },
        ),
    }
}

/// [`BatchFilter`] backed by an [`Expr`]
#[derive(Debug, Clone)]
pub struct ExpressionFilter {
    expr: Expr,
}

impl ExpressionFilter {
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl BatchFilter for ExpressionFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        if self.expr == Expr::AlwaysTrue {
            return Ok(batch.clone());
        }
        filter_record_batch(batch, &evaluate_expr(batch, &self.expr)?)
    }
}
