//! Adaptation of freshly read tables to the layout the views expect.

pub mod conversions;

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{DashboardError, Result};
use crate::schema::{Derivation, MUERTES, MeasurePolicy, TableKind};

pub use conversions::{
    coerce_counts, derive_age_bins, derive_month_names, derive_normalized, normalize_name,
    parse_count, trim_strings,
};

/// What adaptation had to change in a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdaptationReport {
    /// Measure cells that were null, malformed or negative and became 0
    pub coerced_counts: usize,
    /// The measure was synthesised as one death per row
    pub synthesized_measure: bool,
}

/// Check that all required key columns exist
pub fn check_required_columns(kind: TableKind, schema: &Schema) -> Result<()> {
    let missing: Vec<&str> = kind
        .required_columns()
        .iter()
        .copied()
        .filter(|column| schema.index_of(column).is_err())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::schema(format!(
            "{kind} table is missing column(s): {}",
            missing.join(", ")
        )))
    }
}

/// Adapt a raw, all-`Utf8` batch of the given table
///
/// String cells are trimmed, the `Muertes` measure becomes a non-null `Int64`
/// column and the derived display columns are appended.
pub fn adapt_record_batch(kind: TableKind, batch: &RecordBatch) -> Result<(RecordBatch, AdaptationReport)> {
    let source_schema = batch.schema();
    check_required_columns(kind, &source_schema)?;

    let mut report = AdaptationReport::default();
    let mut fields: Vec<Field> = Vec::with_capacity(source_schema.fields().len() + 2);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());

    for (field, column) in source_schema.fields().iter().zip(batch.columns()) {
        let name = field.name();
        if name == MUERTES {
            let (counts, coerced) = coerce_counts(column, name)?;
            report.coerced_counts = coerced;
            fields.push(Field::new(name, DataType::Int64, false));
            columns.push(counts);
        } else {
            fields.push(Field::new(name, DataType::Utf8, true));
            columns.push(trim_strings(column, name)?);
        }
    }

    if source_schema.index_of(MUERTES).is_err() {
        match kind.measure_policy() {
            MeasurePolicy::RowCountIfMissing => {
                report.synthesized_measure = true;
                fields.push(Field::new(MUERTES, DataType::Int64, false));
                columns.push(conversions::unit_counts(batch.num_rows()));
            }
            MeasurePolicy::Required => {
                return Err(DashboardError::schema(format!(
                    "{kind} table is missing column: {MUERTES}"
                )));
            }
        }
    }

    for derivation in kind.derivations() {
        let source_idx = fields
            .iter()
            .position(|f| f.name() == derivation.source())
            .ok_or_else(|| {
                DashboardError::schema(format!("{kind} table is missing column: {}", derivation.source()))
            })?;
        let source = &columns[source_idx];
        let derived = match derivation {
            Derivation::MonthName { source: name, .. } => derive_month_names(source, name)?,
            Derivation::AgeBin { source: name, .. } => derive_age_bins(source, name)?,
            Derivation::Normalized { source: name, .. } => derive_normalized(source, name)?,
        };
        fields.push(Field::new(derivation.target(), DataType::Utf8, true));
        columns.push(derived);
    }

    let adapted = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok((adapted, report))
}
