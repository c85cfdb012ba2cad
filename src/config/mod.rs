//! Configuration for the mortality dashboard.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};

/// File names of the input tables, relative to the data directory
#[derive(Debug, Clone)]
pub struct DataFiles {
    /// Deaths by municipality, month and sex
    pub municipality: PathBuf,
    /// Deaths by department, sex and manner of death
    pub department: PathBuf,
    /// Deaths by month, sex, hour and manner of death
    pub monthly: PathBuf,
    /// Deaths by age group, sex and month
    pub age: PathBuf,
    /// Deaths by cause, sex, month and municipality
    pub causes: PathBuf,
    /// Department boundaries (GeoJSON)
    pub boundaries: PathBuf,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            municipality: PathBuf::from("MuertesPorMunicipio.csv"),
            department: PathBuf::from("MuertesPorDepartamento.csv"),
            monthly: PathBuf::from("MuertesPorMes.csv"),
            age: PathBuf::from("MuertesPorEdad.csv"),
            causes: PathBuf::from("MuertesPorMunicipioTabla.csv"),
            boundaries: PathBuf::from("Colombia.geo.json"),
        }
    }
}

/// Number of groups kept by the ranked views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    /// Municipalities shown in the most-violent-cities bar chart
    pub top_cities: usize,
    /// Municipalities shown in the lowest-mortality pie chart
    pub lowest_cities: usize,
    /// Causes listed in the cause table
    pub top_causes: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_cities: 5,
            lowest_cities: 10,
            top_causes: 10,
        }
    }
}

/// Configuration for loading the dashboard tables
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Directory holding the processed input files
    pub data_dir: PathBuf,
    /// Input file names
    pub files: DataFiles,
    /// Field delimiter of the CSV tables
    pub delimiter: u8,
    /// Rows per Arrow batch while reading CSV
    pub batch_size: usize,
    /// Ranking sizes for the top/bottom views
    pub ranking: RankingConfig,
    /// Show a progress bar while loading
    pub show_progress: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("ArchivosProcesados"),
            files: DataFiles::default(),
            delimiter: b';',
            batch_size: 8192,
            ranking: RankingConfig::default(),
            show_progress: true,
        }
    }
}

impl DashboardConfig {
    /// Configuration rooted at a different data directory
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Full path of an input file
    #[must_use]
    pub fn path_of(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Check values that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DashboardError::Config("batch size must be positive".into()));
        }
        if !self.delimiter.is_ascii() || self.delimiter == b'\n' || self.delimiter == b'"' {
            return Err(DashboardError::Config(format!(
                "unusable delimiter {:?}",
                self.delimiter as char
            )));
        }
        Ok(())
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8050,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
