//! Month and age-group code tables
//!
//! The source tables encode months as `1..=12` and age groups as the
//! DANE `GRUPO_EDAD1` codes `5..=22`. Views display the Spanish month names
//! and five-year age bins instead.

/// Spanish month names in calendar order
pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Lowest age-group code with a bin (0-4 years)
pub const FIRST_AGE_CODE: i64 = 5;

/// Highest age-group code, the open-ended `85+` bin
pub const LAST_AGE_CODE: i64 = 22;

/// Age bins in display order, indexed by `code - FIRST_AGE_CODE`
pub const AGE_BINS: [&str; 18] = [
    "0-4", "5-9", "10-14", "15-19", "20-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54",
    "55-59", "60-64", "65-69", "70-74", "75-79", "80-84", "85+",
];

/// Month name for a code in `1..=12`
#[must_use]
pub fn month_name(code: i64) -> Option<&'static str> {
    if (1..=12).contains(&code) {
        Some(MONTH_NAMES[(code - 1) as usize])
    } else {
        None
    }
}

/// Month code for a Spanish month name (case-insensitive, surrounding whitespace ignored)
#[must_use]
pub fn month_code(name: &str) -> Option<i64> {
    let name = name.trim();
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|idx| idx as i64 + 1)
}

/// Normalise a raw month cell, which may hold either a code or a name
#[must_use]
pub fn normalize_month(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 => month_name(value as i64),
        Ok(_) => None,
        Err(_) => month_code(raw).and_then(month_name),
    }
}

/// Five-year age bin for a `GRUPO_EDAD1` code in `5..=22`
#[must_use]
pub fn age_bin(code: i64) -> Option<&'static str> {
    if (FIRST_AGE_CODE..=LAST_AGE_CODE).contains(&code) {
        Some(AGE_BINS[(code - FIRST_AGE_CODE) as usize])
    } else {
        None
    }
}

/// Position of an age bin label in display order
#[must_use]
pub fn age_bin_position(label: &str) -> Option<usize> {
    AGE_BINS.iter().position(|bin| *bin == label)
}

/// Position of a month name in calendar order
#[must_use]
pub fn month_position(name: &str) -> Option<usize> {
    month_code(name).map(|code| (code - 1) as usize)
}
