//! Mask application and the [`BatchFilter`] seam
//!
//! A filter never touches its input table; every call yields a new batch
//! sharing nothing mutable with the source.

use arrow::array::{Array, BooleanArray};
use arrow::compute;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::filter::error::{FilterResultExt, filter_err};

/// Keep the rows whose mask entry is `true`
///
/// False and null entries both drop the row.
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if mask.len() != batch.num_rows() {
        return filter_err(format!(
            "mask has {} entries but the table has {} rows",
            mask.len(),
            batch.num_rows()
        ));
    }
    compute::filter_record_batch(batch, mask).with_filter_context("Failed to apply row mask")
}

/// Something that narrows a table to a subset of its rows
pub trait BatchFilter: std::fmt::Debug {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;
}
