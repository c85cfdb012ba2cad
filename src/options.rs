//! Dropdown filters and their option lists
//!
//! Option lists are derived once when the tables are loaded and reused for
//! every page render.

use std::fmt;

use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::calendar::MONTH_NAMES;
use crate::schema::{HORA, MANERA_MUERTE, MES_NOMBRE, MUNICIPIO, SEXO, TableKind};

/// A dropdown filter offered by the views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Month,
    Sex,
    Manner,
    Hour,
    Municipality,
}

impl FilterKind {
    pub const ALL: [Self; 5] = [
        Self::Month,
        Self::Sex,
        Self::Manner,
        Self::Hour,
        Self::Municipality,
    ];

    /// Query-string parameter carrying the selection
    #[must_use]
    pub fn param(&self) -> &'static str {
        match self {
            Self::Month => "mes",
            Self::Sex => "sexo",
            Self::Manner => "manera",
            Self::Hour => "hora",
            Self::Municipality => "municipio",
        }
    }

    /// Table column the selection constrains
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::Month => MES_NOMBRE,
            Self::Sex => SEXO,
            Self::Manner => MANERA_MUERTE,
            Self::Hour => HORA,
            Self::Municipality => MUNICIPIO,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Month => "Mes",
            Self::Sex => "Sexo",
            Self::Manner => "Manera de muerte",
            Self::Hour => "Hora",
            Self::Municipality => "Municipio",
        }
    }

    /// Text of the empty ("everything") choice
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Manner | Self::Hour => "Todas",
            _ => "Todos",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// Distinct non-null values of a string column, sorted
///
/// Columns whose values are all integers (hours) sort numerically.
#[must_use]
pub fn distinct_values(batch: &RecordBatch, column: &str) -> Vec<String> {
    let Some(strings) = batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
    else {
        return Vec::new();
    };

    let values: Vec<&str> = strings.iter().flatten().unique().collect();

    if !values.is_empty() && values.iter().all(|v| v.parse::<i64>().is_ok()) {
        values
            .into_iter()
            .sorted_by_key(|v| v.parse::<i64>().unwrap_or_default())
            .map(str::to_string)
            .collect()
    } else {
        values.into_iter().sorted().map(str::to_string).collect()
    }
}

/// Option lists per table and filter
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    lists: FxHashMap<(TableKind, FilterKind), Vec<String>>,
}

impl FilterOptions {
    /// Derive the option lists of one table
    ///
    /// Months always list the twelve month names in calendar order; the other
    /// filters list the values present in the table.
    pub fn add_table(&mut self, kind: TableKind, batch: &RecordBatch) {
        for filter in FilterKind::ALL {
            if batch.schema().index_of(filter.column()).is_err() {
                continue;
            }
            let values = match filter {
                FilterKind::Month => MONTH_NAMES.iter().map(|m| (*m).to_string()).collect(),
                _ => distinct_values(batch, filter.column()),
            };
            self.lists.insert((kind, filter), values);
        }
    }

    /// Options of a filter on a table; empty when the table lacks the column
    #[must_use]
    pub fn get(&self, table: TableKind, filter: FilterKind) -> &[String] {
        self.lists
            .get(&(table, filter))
            .map_or(&[], Vec::as_slice)
    }
}
