//! The dashboard views
//!
//! Each view is a pure function of the loaded data and the current dropdown
//! selections. A request produces a fresh [`ViewResult`]; nothing is cached
//! between requests.

mod builders;
pub mod figure;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::GroupedTable;
use crate::dataset::DashboardData;
use crate::error::Result;
use crate::options::FilterKind;
use crate::schema::TableKind;

pub use builders::{
    age_histogram, cause_table, deaths_by_month, deaths_by_sex, department_map, lowest_mortality,
    violent_cities,
};

/// Title of the dashboard, also used by the landing page
pub const DASHBOARD_TITLE: &str = "Análisis de Mortalidad en Colombia 2019";

/// The seven addressable views, in tour order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    #[serde(rename = "mapa")]
    Map,
    #[serde(rename = "muerte-por-mes")]
    DeathsByMonth,
    #[serde(rename = "ciudades-mas-violentas")]
    ViolentCities,
    #[serde(rename = "indice-mortalidad")]
    LowestMortality,
    #[serde(rename = "tabla-causas-muertes")]
    CauseTable,
    #[serde(rename = "histograma-mortalidad")]
    AgeHistogram,
    #[serde(rename = "muertes-por-sexo")]
    DeathsBySex,
}

/// A navigation link between views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

impl ViewKind {
    /// Fixed linear navigation order
    pub const TOUR: [Self; 7] = [
        Self::Map,
        Self::DeathsByMonth,
        Self::ViolentCities,
        Self::LowestMortality,
        Self::CauseTable,
        Self::AgeHistogram,
        Self::DeathsBySex,
    ];

    /// Path segment of the view
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Map => "mapa",
            Self::DeathsByMonth => "muerte-por-mes",
            Self::ViolentCities => "ciudades-mas-violentas",
            Self::LowestMortality => "indice-mortalidad",
            Self::CauseTable => "tabla-causas-muertes",
            Self::AgeHistogram => "histograma-mortalidad",
            Self::DeathsBySex => "muertes-por-sexo",
        }
    }

    /// Absolute page path
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Map => "/mapa",
            Self::DeathsByMonth => "/muerte-por-mes",
            Self::ViolentCities => "/ciudades-mas-violentas",
            Self::LowestMortality => "/indice-mortalidad",
            Self::CauseTable => "/tabla-causas-muertes",
            Self::AgeHistogram => "/histograma-mortalidad",
            Self::DeathsBySex => "/muertes-por-sexo",
        }
    }

    /// Look up a view by slug, with or without the leading slash
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim_start_matches('/').trim_end_matches('/');
        Self::TOUR.into_iter().find(|view| view.slug() == slug)
    }

    /// Page heading
    #[must_use]
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Map => "Mapa de Muertes por Departamento",
            Self::DeathsByMonth => "Muertes por mes para el año 2019",
            Self::ViolentCities => "TOP 5 Ciudades más violentas de Colombia",
            Self::LowestMortality => "TOP 10 Ciudades con Menor Mortalidad",
            Self::CauseTable => "10 Principales Causas de Muerte en Colombia",
            Self::AgeHistogram => "Distribución de Muertes por Rango de Edad",
            Self::DeathsBySex => "Muertes por Departamento y Sexo",
        }
    }

    /// Table the view aggregates
    #[must_use]
    pub fn table(&self) -> TableKind {
        match self {
            Self::Map | Self::DeathsBySex => TableKind::Department,
            Self::DeathsByMonth => TableKind::Monthly,
            Self::ViolentCities | Self::LowestMortality => TableKind::Municipality,
            Self::CauseTable => TableKind::Causes,
            Self::AgeHistogram => TableKind::Age,
        }
    }

    /// Dropdowns shown on the view, in display order
    #[must_use]
    pub fn filters(&self) -> &'static [FilterKind] {
        match self {
            Self::Map => &[FilterKind::Sex, FilterKind::Manner],
            Self::DeathsByMonth => &[FilterKind::Sex, FilterKind::Hour, FilterKind::Manner],
            Self::ViolentCities | Self::LowestMortality | Self::AgeHistogram => {
                &[FilterKind::Month, FilterKind::Sex]
            }
            Self::CauseTable => &[FilterKind::Month, FilterKind::Sex, FilterKind::Municipality],
            Self::DeathsBySex => &[FilterKind::Manner],
        }
    }

    fn position(&self) -> usize {
        Self::TOUR.iter().position(|v| v == self).unwrap_or(0)
    }

    /// Link to the previous view; the map starts the tour and has none
    #[must_use]
    pub fn previous(&self) -> Option<NavLink> {
        match self {
            Self::Map => None,
            Self::DeathsByMonth => Some(NavLink {
                href: Self::Map.path(),
                label: "Volver al Mapa",
            }),
            _ => Some(NavLink {
                href: Self::TOUR[self.position() - 1].path(),
                label: "Volver",
            }),
        }
    }

    /// Link to the next view; the last view returns to the landing page
    #[must_use]
    pub fn next(&self) -> NavLink {
        match Self::TOUR.get(self.position() + 1) {
            Some(next) => NavLink {
                href: next.path(),
                label: "Siguiente",
            },
            None => NavLink {
                href: "/",
                label: "Inicio",
            },
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Dropdown selections of one request, keyed by query parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewFilters {
    pub mes: Option<String>,
    pub sexo: Option<String>,
    pub manera: Option<String>,
    pub hora: Option<String>,
    pub municipio: Option<String>,
}

impl ViewFilters {
    /// Selected value of a filter, if any
    #[must_use]
    pub fn get(&self, filter: FilterKind) -> Option<&str> {
        match filter {
            FilterKind::Month => self.mes.as_deref(),
            FilterKind::Sex => self.sexo.as_deref(),
            FilterKind::Manner => self.manera.as_deref(),
            FilterKind::Hour => self.hora.as_deref(),
            FilterKind::Municipality => self.municipio.as_deref(),
        }
    }

    /// Set a filter, builder style
    #[must_use]
    pub fn with(mut self, filter: FilterKind, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match filter {
            FilterKind::Month => self.mes = value,
            FilterKind::Sex => self.sexo = value,
            FilterKind::Manner => self.manera = value,
            FilterKind::Hour => self.hora = value,
            FilterKind::Municipality => self.municipio = value,
        }
        self
    }
}

/// One line of the cause table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseRow {
    pub codigo: String,
    pub causa: String,
    pub casos: i64,
}

/// Header of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub id: &'static str,
    pub name: &'static str,
}

/// What the browser renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewBody {
    /// A Plotly figure (`data` + `layout`)
    Figure { figure: Value },
    /// A plain table
    Table {
        columns: Vec<TableColumn>,
        rows: Vec<CauseRow>,
    },
}

/// Result of recomputing a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    pub view: ViewKind,
    pub title: String,
    pub body: ViewBody,
    /// Grouped rows behind the chart, in display order
    #[serde(skip)]
    pub data: GroupedTable,
}

impl ViewResult {
    /// Sum of the measure over the displayed groups
    #[must_use]
    pub fn total(&self) -> i64 {
        self.data.total()
    }
}

/// Recompute a view for the given selections
pub fn build_view(data: &DashboardData, view: ViewKind, filters: &ViewFilters) -> Result<ViewResult> {
    match view {
        ViewKind::Map => department_map(data, filters),
        ViewKind::DeathsByMonth => deaths_by_month(data, filters),
        ViewKind::ViolentCities => violent_cities(data, filters),
        ViewKind::LowestMortality => lowest_mortality(data, filters),
        ViewKind::CauseTable => cause_table(data, filters),
        ViewKind::AgeHistogram => age_histogram(data, filters),
        ViewKind::DeathsBySex => deaths_by_sex(data, filters),
    }
}
