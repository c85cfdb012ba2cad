//! The loaded dashboard data
//!
//! [`DashboardData`] owns every adapted table, the department boundaries and
//! the precomputed dropdown options. It is built once at startup and shared
//! read-only between requests.

use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::config::{DashboardConfig, RankingConfig};
use crate::error::util::validate_directory;
use crate::error::{DashboardError, Result};
use crate::loader::{Boundaries, load_boundaries, load_tables};
use crate::options::{FilterKind, FilterOptions};
use crate::schema::TableKind;
use crate::schema::adapt::adapt_record_batch;

/// Immutable tables, boundaries and filter options
#[derive(Debug, Clone)]
pub struct DashboardData {
    tables: FxHashMap<TableKind, RecordBatch>,
    boundaries: Boundaries,
    options: FilterOptions,
    ranking: RankingConfig,
}

impl DashboardData {
    /// Load everything named by the configuration
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let start = Instant::now();
        validate_directory(&config.data_dir, "loading the dashboard data")?;

        let tables = load_tables(config)?
            .into_iter()
            .map(|table| (table.kind, table.batch))
            .collect::<Vec<_>>();
        let boundaries = load_boundaries(&config.path_of(&config.files.boundaries))?;

        let data = Self::from_adapted(tables, boundaries, config.ranking)?;
        log::info!(
            "Dashboard data ready: {} rows across {} tables in {:?}",
            data.total_rows(),
            data.tables.len(),
            start.elapsed()
        );
        Ok(data)
    }

    /// Build from tables that already went through schema adaptation
    ///
    /// Every [`TableKind`] must be present exactly once.
    pub fn from_adapted(
        tables: Vec<(TableKind, RecordBatch)>,
        boundaries: Boundaries,
        ranking: RankingConfig,
    ) -> Result<Self> {
        let mut by_kind: FxHashMap<TableKind, RecordBatch> = FxHashMap::default();
        let mut options = FilterOptions::default();

        for (kind, batch) in tables {
            options.add_table(kind, &batch);
            if by_kind.insert(kind, batch).is_some() {
                return Err(DashboardError::Config(format!("{kind} table given twice")));
            }
        }
        if let Some(missing) = TableKind::ALL.iter().find(|k| !by_kind.contains_key(k)) {
            return Err(DashboardError::Config(format!("{missing} table is missing")));
        }

        Ok(Self {
            tables: by_kind,
            boundaries,
            options,
            ranking,
        })
    }

    /// Build from raw all-`Utf8` tables, adapting each one
    pub fn from_raw(
        tables: Vec<(TableKind, RecordBatch)>,
        boundaries: Boundaries,
        ranking: RankingConfig,
    ) -> Result<Self> {
        let adapted = tables
            .into_iter()
            .map(|(kind, raw)| adapt_record_batch(kind, &raw).map(|(batch, _)| (kind, batch)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_adapted(adapted, boundaries, ranking)
    }

    /// The adapted table of a kind
    pub fn table(&self, kind: TableKind) -> Result<&RecordBatch> {
        self.tables
            .get(&kind)
            .ok_or_else(|| DashboardError::Config(format!("{kind} table is not loaded")))
    }

    #[must_use]
    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    #[must_use]
    pub fn ranking(&self) -> RankingConfig {
        self.ranking
    }

    /// Dropdown options of a filter on a table
    #[must_use]
    pub fn options(&self, table: TableKind, filter: FilterKind) -> &[String] {
        self.options.get(table, filter)
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.tables.values().map(RecordBatch::num_rows).sum()
    }
}
