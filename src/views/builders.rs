//! One builder per view
//!
//! Every builder runs a single [`AggregateQuery`] on the view's table with the
//! view's dropdowns as constraints, then shapes the grouped rows into a figure
//! or table. An empty result still yields a valid, empty figure.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use smallvec::smallvec;

use super::figure::{ACCENT, BACKGROUND, BOUNDARIES_URL, FOREGROUND, color_scale, figure, themed_layout};
use super::{CauseRow, TableColumn, ViewBody, ViewFilters, ViewKind, ViewResult};
use crate::aggregate::{AggregateQuery, GroupedRow, GroupedTable};
use crate::calendar::{AGE_BINS, month_position};
use crate::dataset::DashboardData;
use crate::error::Result;
use crate::schema::{COD_MUERTE, DEPARTAMENTO, DEPARTAMENTO_NORM, DESCRIPCION, EDAD_RANGO, MES_NOMBRE, MUERTES, MUNICIPIO, SEXO};
use crate::utils::logging::log_view_computed;

const MEASURE_LABEL: &str = "# Muertes";

/// Query over the view's table constrained by the view's dropdowns
fn base_query(view: ViewKind, filters: &ViewFilters) -> AggregateQuery {
    view.filters()
        .iter()
        .fold(AggregateQuery::new(MUERTES), |query, filter| {
            query.filter(filter.column(), filters.get(*filter))
        })
}

fn run(data: &DashboardData, view: ViewKind, query: &AggregateQuery) -> Result<GroupedTable> {
    let grouped = query.execute(data.table(view.table())?)?;
    log_view_computed(
        view.slug(),
        grouped.len(),
        grouped.total(),
        query.constraints().iter().filter(|c| c.is_set()).count(),
    );
    Ok(grouped)
}

fn keys_and_values(table: &GroupedTable) -> (Vec<&str>, Vec<i64>) {
    table.rows.iter().map(|row| (row.key(), row.value)).unzip()
}

fn single_key_row(key: &str, value: i64) -> GroupedRow {
    GroupedRow {
        keys: smallvec![key.to_string()],
        value,
    }
}

fn figure_result(view: ViewKind, title: String, figure: Value, data: GroupedTable) -> ViewResult {
    ViewResult {
        view,
        title,
        body: ViewBody::Figure { figure },
        data,
    }
}

/// Choropleth of deaths per department
///
/// Every boundary department is drawn; departments without deaths get 0.
pub fn department_map(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::Map;
    let grouped = run(data, view, &base_query(view, filters).group_by([DEPARTAMENTO_NORM]))?;

    let sums: FxHashMap<&str, i64> = grouped.rows.iter().map(|row| (row.key(), row.value)).collect();
    let rows = data
        .boundaries()
        .departments
        .iter()
        .map(|department| single_key_row(department, sums.get(department.as_str()).copied().unwrap_or(0)))
        .collect();
    let joined = GroupedTable {
        group_by: grouped.group_by.clone(),
        measure: grouped.measure.clone(),
        rows,
    };

    let (locations, z) = keys_and_values(&joined);
    let trace = json!({
        "type": "choropleth",
        "geojson": BOUNDARIES_URL,
        "featureidkey": "id",
        "locations": locations,
        "z": z,
        "zmin": 0,
        "zmax": joined.max_value(),
        "colorscale": color_scale(&["white", "yellow", "red"]),
        "colorbar": { "title": { "text": MEASURE_LABEL } },
        "marker": { "line": { "width": 0.5, "color": "gray" } },
        "hovertemplate": "%{location}<br># Muertes: %{z}<extra></extra>",
    });
    let layout = themed_layout(
        view.heading(),
        40,
        json!({
            "geo": { "fitbounds": "locations", "visible": false, "bgcolor": BACKGROUND },
            "margin": { "r": 0, "t": 50, "l": 0, "b": 0 },
        }),
    );

    Ok(figure_result(view, view.heading().to_string(), figure(vec![trace], layout), joined))
}

/// Line chart of deaths per month, in calendar order
pub fn deaths_by_month(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::DeathsByMonth;
    let mut grouped = run(data, view, &base_query(view, filters).group_by([MES_NOMBRE]))?;
    grouped
        .rows
        .sort_by_key(|row| month_position(row.key()).unwrap_or(usize::MAX));

    let (months, deaths) = keys_and_values(&grouped);
    let trace = json!({
        "type": "scatter",
        "mode": "lines+markers",
        "x": months,
        "y": deaths,
        "line": { "color": ACCENT },
        "hovertemplate": "Mes: %{x}<br># Muertes: %{y}<extra></extra>",
    });
    let layout = themed_layout(
        view.heading(),
        28,
        json!({
            "xaxis": { "title": { "text": "" }, "categoryorder": "array", "categoryarray": months },
            "yaxis": { "title": { "text": "" } },
        }),
    );

    Ok(figure_result(view, view.heading().to_string(), figure(vec![trace], layout), grouped))
}

/// Bar chart of the municipalities with the most deaths
pub fn violent_cities(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::ViolentCities;
    let k = data.ranking().top_cities;
    let grouped = run(data, view, &base_query(view, filters).group_by([MUNICIPIO]).top(k))?;

    let (cities, deaths) = keys_and_values(&grouped);
    let trace = json!({
        "type": "bar",
        "x": cities,
        "y": deaths,
        "marker": {
            "color": deaths,
            "colorscale": color_scale(&["red", "yellow", "green"]),
            "cmin": grouped.min_value(),
            "cmax": grouped.max_value(),
            "showscale": true,
            "line": { "color": FOREGROUND, "width": 1 },
        },
    });
    let title = format!("Top {k} Ciudades Con mas Muertes por Homicidio");
    let layout = themed_layout(
        &title,
        28,
        json!({
            "xaxis": { "title": { "text": "Ciudad" } },
            "yaxis": { "title": { "text": "# Muertes por Homicidio en colombia" } },
        }),
    );

    Ok(figure_result(view, title, figure(vec![trace], layout), grouped))
}

/// Pie chart of the municipalities with the fewest deaths
pub fn lowest_mortality(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::LowestMortality;
    let k = data.ranking().lowest_cities;
    let grouped = run(data, view, &base_query(view, filters).group_by([MUNICIPIO]).bottom(k))?;

    let (cities, deaths) = keys_and_values(&grouped);
    let colors: Vec<&str> = ["green", "yellow", "red"]
        .into_iter()
        .cycle()
        .take(cities.len())
        .collect();
    let trace = json!({
        "type": "pie",
        "labels": cities,
        "values": deaths,
        "textposition": "inside",
        "textinfo": "percent+label",
        "marker": { "colors": colors, "line": { "color": FOREGROUND, "width": 1 } },
    });
    let title = "Ciudades con Menor Número de Muertes en el año 2019 para Colombia".to_string();
    let layout = themed_layout(&title, 28, json!({}));

    Ok(figure_result(view, title, figure(vec![trace], layout), grouped))
}

/// Table of the most frequent causes of death
pub fn cause_table(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::CauseTable;
    let k = data.ranking().top_causes;
    let grouped = run(data, view, &base_query(view, filters).group_by([COD_MUERTE, DESCRIPCION]).top(k))?;

    let rows = grouped
        .rows
        .iter()
        .map(|row| CauseRow {
            codigo: row.key().to_string(),
            causa: row.keys.get(1).cloned().unwrap_or_default(),
            casos: row.value,
        })
        .collect();

    Ok(ViewResult {
        view,
        title: view.heading().to_string(),
        body: ViewBody::Table {
            columns: vec![
                TableColumn { id: "codigo", name: "Código" },
                TableColumn { id: "causa", name: "Causa" },
                TableColumn { id: "casos", name: "Casos" },
            ],
            rows,
        },
        data: grouped,
    })
}

/// Histogram of deaths per five-year age bin
///
/// All bins are shown in age order, empty ones as 0.
pub fn age_histogram(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::AgeHistogram;
    let grouped = run(data, view, &base_query(view, filters).group_by([EDAD_RANGO]))?;

    let sums: FxHashMap<&str, i64> = grouped.rows.iter().map(|row| (row.key(), row.value)).collect();
    let rows = AGE_BINS
        .iter()
        .map(|bin| single_key_row(bin, sums.get(bin).copied().unwrap_or(0)))
        .collect();
    let filled = GroupedTable {
        group_by: grouped.group_by.clone(),
        measure: grouped.measure.clone(),
        rows,
    };

    let (bins, deaths) = keys_and_values(&filled);
    let trace = json!({
        "type": "bar",
        "x": bins,
        "y": deaths,
        "marker": { "color": "#f8e2fc" },
    });
    let title = "Muertes por Rango de Edad (quinquenales)".to_string();
    let layout = themed_layout(
        &title,
        24,
        json!({
            "bargap": 0.05,
            "xaxis": { "title": { "text": "Rango de Edad" }, "categoryorder": "array", "categoryarray": AGE_BINS },
            "yaxis": { "title": { "text": MEASURE_LABEL } },
        }),
    );

    Ok(figure_result(view, title, figure(vec![trace], layout), filled))
}

fn sex_color(sex: &str) -> Option<&'static str> {
    match sex {
        "Masculino" => Some("#ff66b2"),
        "Femenino" => Some("#66ccff"),
        _ => None,
    }
}

/// Stacked horizontal bars of deaths per department, one segment per sex
///
/// Departments are ordered by total deaths descending, ties by name.
pub fn deaths_by_sex(data: &DashboardData, filters: &ViewFilters) -> Result<ViewResult> {
    let view = ViewKind::DeathsBySex;
    let mut grouped = run(data, view, &base_query(view, filters).group_by([DEPARTAMENTO, SEXO]))?;

    let mut totals: FxHashMap<String, i64> = FxHashMap::default();
    let mut cells: FxHashMap<(String, String), i64> = FxHashMap::default();
    for row in &grouped.rows {
        let department = row.key().to_string();
        let sex = row.keys.get(1).cloned().unwrap_or_default();
        let total = totals.entry(department.clone()).or_insert(0);
        *total = total.saturating_add(row.value);
        cells.insert((department, sex), row.value);
    }

    let departments: Vec<String> = totals
        .iter()
        .sorted_by(|(a_name, a_total), (b_name, b_total)| b_total.cmp(a_total).then_with(|| a_name.cmp(b_name)))
        .map(|(name, _)| name.clone())
        .collect();
    let sexes: Vec<String> = grouped
        .rows
        .iter()
        .filter_map(|row| row.keys.get(1).cloned())
        .unique()
        .sorted()
        .collect();

    let traces: Vec<Value> = sexes
        .iter()
        .map(|sex| {
            let deaths: Vec<i64> = departments
                .iter()
                .map(|department| cells.get(&(department.clone(), sex.clone())).copied().unwrap_or(0))
                .collect();
            let mut trace = json!({
                "type": "bar",
                "orientation": "h",
                "name": sex,
                "x": deaths,
                "y": departments,
                "marker": { "line": { "color": FOREGROUND, "width": 0.5 } },
            });
            if let Some(color) = sex_color(sex) {
                trace["marker"]["color"] = json!(color);
            }
            trace
        })
        .collect();

    let position: FxHashMap<&str, usize> = departments
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    grouped.rows.sort_by(|a, b| {
        let pa = position.get(a.key()).copied().unwrap_or(usize::MAX);
        let pb = position.get(b.key()).copied().unwrap_or(usize::MAX);
        pa.cmp(&pb).then_with(|| a.keys.cmp(&b.keys))
    });

    let layout = themed_layout(
        view.heading(),
        28,
        json!({
            "barmode": "stack",
            "legend": { "title": { "text": "Sexo" } },
            "xaxis": { "title": { "text": MEASURE_LABEL } },
            "yaxis": {
                "title": { "text": "Departamento" },
                "categoryorder": "array",
                "categoryarray": departments,
                "autorange": "reversed",
            },
            "height": (departments.len() * 28).max(400),
        }),
    );

    Ok(figure_result(view, view.heading().to_string(), figure(traces, layout), grouped))
}
