//! Filter, group, sum and rank
//!
//! Every dashboard view reduces to one [`AggregateQuery`]: equality
//! constraints narrow a table, the remaining rows are grouped by one or more
//! string columns, the `Int64` measure is summed per group, and an optional
//! top-K / bottom-K selection is taken.
//!
//! Grouped rows are ordered by their key tuple ascending before any ranking
//! is applied. Ranking uses a stable sort on the measure, so ties keep that
//! key order and results are identical across runs.

mod selection;

pub use selection::Selection;

use arrow::array::{Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{DashboardError, Result};
use crate::filter::{Constraint, apply_constraints};

/// Key tuple of a group; views group by one or two columns
pub type GroupKey = SmallVec<[String; 2]>;

/// One output row of an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRow {
    pub keys: GroupKey,
    pub value: i64,
}

impl GroupedRow {
    /// First key, the only one for single-column groupings
    #[must_use]
    pub fn key(&self) -> &str {
        self.keys.first().map_or("", String::as_str)
    }
}

/// Result of an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedTable {
    pub group_by: Vec<String>,
    pub measure: String,
    pub rows: Vec<GroupedRow>,
}

impl GroupedTable {
    /// An aggregation result without rows
    #[must_use]
    pub fn empty(group_by: Vec<String>, measure: impl Into<String>) -> Self {
        Self {
            group_by,
            measure: measure.into(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the measure over all groups, saturating at `i64::MAX`
    #[must_use]
    pub fn total(&self) -> i64 {
        self.rows.iter().map(|r| r.value).fold(0, i64::saturating_add)
    }

    /// Measure of the group with exactly these keys
    #[must_use]
    pub fn value_of(&self, keys: &[&str]) -> Option<i64> {
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .map(|row| row.value)
    }

    /// Largest group measure, 0 when empty
    #[must_use]
    pub fn max_value(&self) -> i64 {
        self.rows.iter().map(|r| r.value).max().unwrap_or(0)
    }

    /// Smallest group measure, 0 when empty
    #[must_use]
    pub fn min_value(&self) -> i64 {
        self.rows.iter().map(|r| r.value).min().unwrap_or(0)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DashboardError::aggregate(format!("Group column '{name}' not found")))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| DashboardError::aggregate(format!("Group column '{name}' is not a string column")))
}

fn measure_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DashboardError::aggregate(format!("Measure column '{name}' not found")))?
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| DashboardError::aggregate(format!("Measure column '{name}' is not an Int64 column")))
}

/// Group a batch by string columns and sum an `Int64` measure
///
/// Rows with a null in any group column are dropped; null measures count as 0.
/// The result is ordered by key tuple ascending.
pub fn group_sum<S: AsRef<str>>(batch: &RecordBatch, group_by: &[S], measure: &str) -> Result<GroupedTable> {
    if group_by.is_empty() {
        return Err(DashboardError::aggregate("at least one group column is required"));
    }

    let key_columns = group_by
        .iter()
        .map(|name| string_column(batch, name.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let values = measure_column(batch, measure)?;

    let mut sums: FxHashMap<SmallVec<[&str; 2]>, i64> = FxHashMap::default();
    'rows: for row in 0..batch.num_rows() {
        let mut key: SmallVec<[&str; 2]> = SmallVec::with_capacity(key_columns.len());
        for column in &key_columns {
            if column.is_null(row) {
                continue 'rows;
            }
            key.push(column.value(row));
        }
        let value = if values.is_null(row) { 0 } else { values.value(row) };
        let sum = sums.entry(key).or_insert(0);
        *sum = sum.saturating_add(value);
    }

    let mut rows: Vec<GroupedRow> = sums
        .into_iter()
        .map(|(key, value)| GroupedRow {
            keys: key.into_iter().map(str::to_string).collect(),
            value,
        })
        .collect();
    rows.sort_by(|a, b| a.keys.cmp(&b.keys));

    Ok(GroupedTable {
        group_by: group_by.iter().map(|g| g.as_ref().to_string()).collect(),
        measure: measure.to_string(),
        rows,
    })
}

/// A filter-aggregate-rank request against one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    constraints: Vec<Constraint>,
    group_by: Vec<String>,
    measure: String,
    selection: Selection,
}

impl AggregateQuery {
    /// Sum `measure` with no constraints, grouping or ranking yet
    #[must_use]
    pub fn new(measure: impl Into<String>) -> Self {
        Self {
            constraints: Vec::new(),
            group_by: Vec::new(),
            measure: measure.into(),
            selection: Selection::All,
        }
    }

    /// Restrict `column` to the selected value; unset selections are ignored
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, selected: Option<&str>) -> Self {
        self.constraints.push(Constraint::new(column, selected));
        self
    }

    #[must_use]
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Keep the `k` largest groups
    #[must_use]
    pub fn top(self, k: usize) -> Self {
        self.select(Selection::Top(k))
    }

    /// Keep the `k` smallest groups
    #[must_use]
    pub fn bottom(self, k: usize) -> Self {
        self.select(Selection::Bottom(k))
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Run the query; the input batch is left untouched
    pub fn execute(&self, batch: &RecordBatch) -> Result<GroupedTable> {
        let filtered = apply_constraints(batch, &self.constraints)?;
        let mut grouped = group_sum(&filtered, &self.group_by, &self.measure)?;
        self.selection.apply(&mut grouped.rows);
        Ok(grouped)
    }
}
