//! Table layouts of the mortality datasets
//!
//! Every input table is read with all columns as `Utf8` and then adapted
//! (see [`adapt`]): the measure column becomes `Int64` and a few display
//! columns are derived from coded ones.

pub mod adapt;

use std::fmt;
use std::path::Path;

use crate::config::DataFiles;

/// Municipality code
pub const COD_MUNICIPIO: &str = "COD_MUNICIPIO";
/// Municipality name
pub const MUNICIPIO: &str = "MUNICIPIO";
/// Department name as written in the death tables
pub const DEPARTAMENTO: &str = "DEPARTAMENTO";
/// Month of death, either `1..=12` or a Spanish month name
pub const MES: &str = "MES";
/// Sex of the deceased
pub const SEXO: &str = "SEXO";
/// Hour of death
pub const HORA: &str = "HORA";
/// Manner of death (homicide, natural, ...)
pub const MANERA_MUERTE: &str = "MANERA_MUERTE";
/// DANE five-year age group code
pub const GRUPO_EDAD1: &str = "GRUPO_EDAD1";
/// Four-character cause-of-death code
pub const COD_MUERTE: &str = "COD_MUERTE";
/// Cause-of-death description
pub const DESCRIPCION: &str = "Descripcion";
/// Death count, the measure of every table
pub const MUERTES: &str = "Muertes";

/// Derived: Spanish month name
pub const MES_NOMBRE: &str = "MES_NOMBRE";
/// Derived: five-year age bin label
pub const EDAD_RANGO: &str = "EDAD_RANGO";
/// Derived: trimmed, uppercased department name used to join with the boundaries
pub const DEPARTAMENTO_NORM: &str = "DEPARTAMENTO_NORM";

/// Property of a boundary feature holding the department name
pub const BOUNDARY_NAME_PROPERTY: &str = "NOMBRE_DPT";

/// How the measure column is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurePolicy {
    /// The table must carry a `Muertes` column
    Required,
    /// Without a `Muertes` column every row counts as one death
    RowCountIfMissing,
}

/// A column computed from another one at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Month code or name to Spanish month name
    MonthName {
        source: &'static str,
        target: &'static str,
    },
    /// Age-group code to five-year bin
    AgeBin {
        source: &'static str,
        target: &'static str,
    },
    /// Trimmed, uppercased copy
    Normalized {
        source: &'static str,
        target: &'static str,
    },
}

impl Derivation {
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Self::MonthName { source, .. }
            | Self::AgeBin { source, .. }
            | Self::Normalized { source, .. } => source,
        }
    }

    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            Self::MonthName { target, .. }
            | Self::AgeBin { target, .. }
            | Self::Normalized { target, .. } => target,
        }
    }
}

const MONTH_NAME: Derivation = Derivation::MonthName {
    source: MES,
    target: MES_NOMBRE,
};

/// The pre-aggregated death tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Deaths by municipality, month and sex
    Municipality,
    /// Deaths by department, sex and manner of death
    Department,
    /// Deaths by month, sex, hour and manner of death
    Monthly,
    /// Deaths by age group, sex and month
    Age,
    /// Deaths by cause, sex, month and municipality
    Causes,
}

impl TableKind {
    pub const ALL: [Self; 5] = [
        Self::Municipality,
        Self::Department,
        Self::Monthly,
        Self::Age,
        Self::Causes,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Municipality => "municipality",
            Self::Department => "department",
            Self::Monthly => "monthly",
            Self::Age => "age",
            Self::Causes => "causes",
        }
    }

    /// Input file of this table
    #[must_use]
    pub fn file<'a>(&self, files: &'a DataFiles) -> &'a Path {
        match self {
            Self::Municipality => &files.municipality,
            Self::Department => &files.department,
            Self::Monthly => &files.monthly,
            Self::Age => &files.age,
            Self::Causes => &files.causes,
        }
    }

    /// Key columns that must be present in the file
    #[must_use]
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Municipality => &[MUNICIPIO, MES, SEXO],
            Self::Department => &[DEPARTAMENTO, SEXO, MANERA_MUERTE],
            Self::Monthly => &[MES, SEXO, HORA, MANERA_MUERTE],
            Self::Age => &[GRUPO_EDAD1, SEXO, MES],
            Self::Causes => &[COD_MUERTE, DESCRIPCION, SEXO, MES, MUNICIPIO],
        }
    }

    #[must_use]
    pub fn measure_policy(&self) -> MeasurePolicy {
        match self {
            Self::Age => MeasurePolicy::RowCountIfMissing,
            _ => MeasurePolicy::Required,
        }
    }

    /// Columns derived after loading
    #[must_use]
    pub fn derivations(&self) -> &'static [Derivation] {
        match self {
            Self::Municipality | Self::Monthly | Self::Causes => &[MONTH_NAME],
            Self::Department => &[Derivation::Normalized {
                source: DEPARTAMENTO,
                target: DEPARTAMENTO_NORM,
            }],
            Self::Age => &[
                MONTH_NAME,
                Derivation::AgeBin {
                    source: GRUPO_EDAD1,
                    target: EDAD_RANGO,
                },
            ],
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical name of a header cell
///
/// Strips a UTF-8 byte order mark and surrounding whitespace. The long
/// description header of the cause table
/// (`Descripcion  de códigos mortalidad a cuatro caracteres`) maps to
/// [`DESCRIPCION`].
#[must_use]
pub fn canonical_column_name(raw: &str) -> String {
    let name = raw.trim_start_matches('\u{feff}').trim();
    if name.len() > DESCRIPCION.len()
        && name
            .get(..DESCRIPCION.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DESCRIPCION))
    {
        return DESCRIPCION.to_string();
    }
    name.to_string()
}
