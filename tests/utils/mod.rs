use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use mortality_dash::{DashboardConfig, DashboardData, Result};

pub const MUNICIPALITY_CSV: &str = "\u{feff}COD_MUNICIPIO;MUNICIPIO;MES;SEXO;Muertes
5001;Medellín;1;Masculino;120
5001;Medellín;1;Femenino;40
5001;Medellín;2;Masculino;100
76001;Cali;1;Masculino;150
76001;Cali;2;Femenino;30
11001;Bogotá D.C.;1;Masculino;90
11001;Bogotá D.C.;2;Masculino;95
52001;Pasto;1;Femenino;5
52001;Pasto;3;Masculino;abc
91001;Leticia;2;Masculino;2
";

pub const DEPARTMENT_CSV: &str = "DEPARTAMENTO;SEXO;MANERA_MUERTE;Muertes
ANTIOQUIA;Masculino;Homicidio;300
ANTIOQUIA;Femenino;Natural;200
VALLE DEL CAUCA;Masculino;Homicidio;350
VALLE DEL CAUCA;Femenino;Homicidio;40
BOGOTÁ, D.C.;Masculino;Natural;180
NARIÑO;Femenino;Accidente de tránsito;25
";

pub const MONTHLY_CSV: &str = "MES;SEXO;HORA;MANERA_MUERTE;Muertes
1;Masculino;0;Homicidio;10
1;Femenino;13;Natural;7
2;Masculino;0;Natural;12
12;Masculino;23;Homicidio;4
Marzo;Femenino;13;Natural;3
";

pub const AGE_CSV: &str = "GRUPO_EDAD1;SEXO;MES
5;Masculino;1
10;Femenino;1
10;Masculino;2
22;Femenino;3
22;Masculino;3
30;Masculino;1
";

pub const CAUSES_CSV: &str = "COD_MUNICIPIO;MUNICIPIO;MES;SEXO;COD_MUERTE;Descripcion  de códigos mortalidad a cuatro caracteres;Muertes
5001;Medellín;1;Masculino;X954;Agresión con disparo de otras armas de fuego;60
5001;Medellín;1;Femenino;I219;Infarto agudo del miocardio, sin otra especificación;30
76001;Cali;1;Masculino;X954;Agresión con disparo de otras armas de fuego;80
76001;Cali;2;Femenino;J189;Neumonía, no especificada;15
11001;Bogotá D.C.;2;Masculino;I219;Infarto agudo del miocardio, sin otra especificación;45
";

pub const BOUNDARIES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "NOMBRE_DPT": "ANTIOQUIA" }, "geometry": null },
    { "type": "Feature", "properties": { "NOMBRE_DPT": "Valle del Cauca" }, "geometry": null },
    { "type": "Feature", "properties": { "NOMBRE_DPT": "NARIÑO" }, "geometry": null },
    { "type": "Feature", "properties": { "NOMBRE_DPT": "AMAZONAS" }, "geometry": null }
  ]
}"#;

/// Fresh scratch directory for one test
#[must_use]
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mortality-dash-{name}-{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("clear scratch dir");
    }
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Write the fixture tables and boundaries into a directory
pub fn write_fixture(dir: &Path) {
    let config = fixture_config(dir);
    let files = &config.files;
    for (file, contents) in [
        (&files.municipality, MUNICIPALITY_CSV),
        (&files.department, DEPARTMENT_CSV),
        (&files.monthly, MONTHLY_CSV),
        (&files.age, AGE_CSV),
        (&files.causes, CAUSES_CSV),
        (&files.boundaries, BOUNDARIES_GEOJSON),
    ] {
        std::fs::write(config.path_of(file), contents).expect("write fixture file");
    }
}

/// Default configuration rooted at a directory, without progress output
#[must_use]
pub fn fixture_config(dir: &Path) -> DashboardConfig {
    DashboardConfig {
        show_progress: false,
        ..DashboardConfig::default()
    }
    .with_data_dir(dir)
}

/// Load the fixture dataset from a fresh directory
pub fn load_fixture(name: &str) -> Result<DashboardData> {
    let dir = scratch_dir(name);
    write_fixture(&dir);
    DashboardData::load(&fixture_config(&dir))
}

/// Build an all-`Utf8` batch from rows of cells
#[must_use]
pub fn utf8_batch(columns: &[&str], rows: &[&[Option<&str>]]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = (0..columns.len())
        .map(|idx| Arc::new(StringArray::from(rows.iter().map(|row| row[idx]).collect::<Vec<_>>())) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("valid test batch")
}
