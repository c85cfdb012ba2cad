//! Table and boundary loading
//!
//! CSV tables are read into a single Arrow record batch each. All columns are
//! read as `Utf8` so that malformed numbers never abort a load; the schema
//! adaptation step then converts the measure leniently.

use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use serde_json::Value;

use crate::config::DashboardConfig;
use crate::error::util::safe_open_file;
use crate::error::{DashboardError, Result};
use crate::schema::adapt::{AdaptationReport, adapt_record_batch, normalize_name};
use crate::schema::{BOUNDARY_NAME_PROPERTY, TableKind, canonical_column_name};
use crate::utils::logging::{
    create_main_progress_bar, finish_progress_bar, log_operation_complete, log_operation_start,
    log_warning,
};

/// An adapted table together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub kind: TableKind,
    pub path: PathBuf,
    pub batch: RecordBatch,
    pub report: AdaptationReport,
}

/// Department boundaries
///
/// Every feature gets its normalised department name as `id`, which is the
/// key the choropleth joins on.
#[derive(Debug, Clone)]
pub struct Boundaries {
    /// The GeoJSON `FeatureCollection`
    pub geojson: Value,
    /// Normalised department names in feature order, without duplicates
    pub departments: Vec<String>,
}

impl Boundaries {
    /// Build boundaries from a parsed GeoJSON document
    pub fn from_geojson(mut geojson: Value) -> Result<Self> {
        let features = geojson
            .get_mut("features")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| DashboardError::schema("boundary document has no 'features' array"))?;

        let mut departments: Vec<String> = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter_mut().enumerate() {
            let name = feature
                .get("properties")
                .and_then(|props| props.get(BOUNDARY_NAME_PROPERTY))
                .and_then(Value::as_str)
                .map(normalize_name)
                .ok_or_else(|| {
                    DashboardError::schema(format!(
                        "boundary feature {idx} has no '{BOUNDARY_NAME_PROPERTY}' property"
                    ))
                })?;

            if let Some(object) = feature.as_object_mut() {
                object.insert("id".to_string(), Value::String(name.clone()));
            }
            if !departments.contains(&name) {
                departments.push(name);
            }
        }

        Ok(Self {
            geojson,
            departments,
        })
    }

    /// An empty feature collection
    #[must_use]
    pub fn empty() -> Self {
        Self {
            geojson: serde_json::json!({ "type": "FeatureCollection", "features": [] }),
            departments: Vec::new(),
        }
    }
}

/// Read the header of a delimited file and build an all-`Utf8` schema
fn read_utf8_schema<R: Read>(reader: R, delimiter: u8) -> Result<Schema> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter);
    let (inferred, _) = format.infer_schema(reader, Some(1))?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(canonical_column_name(f.name()), DataType::Utf8, true))
        .collect();
    Ok(Schema::new(fields))
}

/// Read a delimited file into one record batch with all columns as `Utf8`
pub fn read_csv(path: &Path, delimiter: u8, batch_size: usize) -> Result<RecordBatch> {
    let mut file = safe_open_file(path, "reading a deaths table")?;

    let schema: SchemaRef = Arc::new(read_utf8_schema(&mut file, delimiter)?);
    file.rewind().map_err(|e| DashboardError::io(e, path))?;

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_delimiter(delimiter)
        .with_batch_size(batch_size)
        .with_truncated_rows(true)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Load and adapt one table
pub fn load_table(config: &DashboardConfig, kind: TableKind) -> Result<LoadedTable> {
    let path = config.path_of(kind.file(&config.files));
    log_operation_start(&format!("Loading {kind} table from"), &path);
    let start = Instant::now();

    let raw = read_csv(&path, config.delimiter, config.batch_size)?;
    let (batch, report) = adapt_record_batch(kind, &raw)?;

    if report.coerced_counts > 0 {
        log_warning(
            &format!(
                "{} malformed or negative death counts in the {kind} table were set to 0",
                report.coerced_counts
            ),
            Some(&path),
        );
    }
    if report.synthesized_measure {
        log::info!("{kind} table has no death count column, counting one death per row");
    }
    log_operation_complete("loaded", &path, batch.num_rows(), Some(start.elapsed()));

    Ok(LoadedTable {
        kind,
        path,
        batch,
        report,
    })
}

/// Load all tables in parallel
///
/// The returned tables follow the order of [`TableKind::ALL`].
pub fn load_tables(config: &DashboardConfig) -> Result<Vec<LoadedTable>> {
    config.validate()?;

    let pb = create_main_progress_bar(
        TableKind::ALL.len() as u64,
        Some("Loading mortality tables"),
        config.show_progress,
    );

    let tables = TableKind::ALL
        .par_iter()
        .map(|kind| {
            let table = load_table(config, *kind);
            pb.inc(1);
            table
        })
        .collect::<Result<Vec<_>>>()?;

    finish_progress_bar(&pb, Some("Tables loaded"));
    Ok(tables)
}

/// Load the department boundary document
pub fn load_boundaries(path: &Path) -> Result<Boundaries> {
    log_operation_start("Loading department boundaries from", path);
    let file = safe_open_file(path, "reading department boundaries")?;
    let geojson: Value = serde_json::from_reader(std::io::BufReader::new(file))?;
    let boundaries = Boundaries::from_geojson(geojson)?;
    log::info!(
        "Loaded {} department boundaries from {}",
        boundaries.departments.len(),
        path.display()
    );
    Ok(boundaries)
}
