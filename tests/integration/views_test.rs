use crate::utils::load_fixture;
use mortality_dash::{FilterKind, ViewBody, ViewFilters, ViewKind, build_view};

fn keys(result: &mortality_dash::ViewResult) -> Vec<&str> {
    result.data.rows.iter().map(|row| row.key()).collect()
}

/// Test that the map draws every boundary department and fills gaps with 0
#[test]
fn test_map_covers_every_boundary_department() -> mortality_dash::Result<()> {
    let data = load_fixture("views-map")?;

    let all = build_view(&data, ViewKind::Map, &ViewFilters::default())?;
    assert_eq!(keys(&all), vec!["ANTIOQUIA", "VALLE DEL CAUCA", "NARIÑO", "AMAZONAS"]);
    assert_eq!(all.data.value_of(&["ANTIOQUIA"]), Some(500));
    assert_eq!(all.data.value_of(&["VALLE DEL CAUCA"]), Some(390));
    assert_eq!(all.data.value_of(&["AMAZONAS"]), Some(0));
    // Bogotá has deaths but no boundary feature
    assert_eq!(all.data.value_of(&["BOGOTÁ, D.C."]), None);

    let homicides = build_view(
        &data,
        ViewKind::Map,
        &ViewFilters::default()
            .with(FilterKind::Manner, "Homicidio")
            .with(FilterKind::Sex, "Femenino"),
    )?;
    assert_eq!(homicides.data.len(), 4);
    assert_eq!(homicides.data.value_of(&["VALLE DEL CAUCA"]), Some(40));
    assert_eq!(homicides.data.value_of(&["ANTIOQUIA"]), Some(0));

    let ViewBody::Figure { figure } = &homicides.body else {
        panic!("map should be a figure");
    };
    assert_eq!(figure["data"][0]["type"], "choropleth");
    assert_eq!(figure["data"][0]["zmin"], 0);
    assert_eq!(figure["data"][0]["zmax"], 40);
    Ok(())
}

/// Test that months are listed in calendar order whatever their encoding
#[test]
fn test_months_are_in_calendar_order() -> mortality_dash::Result<()> {
    let data = load_fixture("views-months")?;

    let result = build_view(&data, ViewKind::DeathsByMonth, &ViewFilters::default())?;
    assert_eq!(keys(&result), vec!["Enero", "Febrero", "Marzo", "Diciembre"]);
    assert_eq!(result.data.value_of(&["Enero"]), Some(17));

    let night = build_view(
        &data,
        ViewKind::DeathsByMonth,
        &ViewFilters::default().with(FilterKind::Hour, "0"),
    )?;
    assert_eq!(keys(&night), vec!["Enero", "Febrero"]);
    Ok(())
}

/// Test the ranked municipality views
#[test]
fn test_ranked_municipality_views() -> mortality_dash::Result<()> {
    let data = load_fixture("views-ranked")?;
    let january = ViewFilters::default().with(FilterKind::Month, "Enero");

    let violent = build_view(&data, ViewKind::ViolentCities, &january)?;
    assert_eq!(keys(&violent), vec!["Medellín", "Cali", "Bogotá D.C.", "Pasto"]);
    assert_eq!(violent.total(), 405);

    let lowest = build_view(&data, ViewKind::LowestMortality, &ViewFilters::default())?;
    assert_eq!(keys(&lowest), vec!["Leticia", "Pasto", "Cali", "Bogotá D.C.", "Medellín"]);
    let ViewBody::Figure { figure } = &lowest.body else {
        panic!("lowest mortality should be a figure");
    };
    assert_eq!(figure["data"][0]["type"], "pie");
    Ok(())
}

/// Test the cause table with a municipality selected
#[test]
fn test_cause_table_rows() -> mortality_dash::Result<()> {
    let data = load_fixture("views-causes")?;

    let everywhere = build_view(&data, ViewKind::CauseTable, &ViewFilters::default())?;
    let ViewBody::Table { rows, .. } = &everywhere.body else {
        panic!("cause view should be a table");
    };
    assert_eq!(rows[0].codigo, "X954");
    assert_eq!(rows[0].casos, 140);
    assert_eq!(rows[1].codigo, "I219");
    assert_eq!(rows[1].causa, "Infarto agudo del miocardio, sin otra especificación");
    assert_eq!(rows[1].casos, 75);

    let cali = build_view(
        &data,
        ViewKind::CauseTable,
        &ViewFilters::default().with(FilterKind::Municipality, "Cali"),
    )?;
    let ViewBody::Table { rows, .. } = &cali.body else {
        panic!("cause view should be a table");
    };
    let codes: Vec<&str> = rows.iter().map(|row| row.codigo.as_str()).collect();
    assert_eq!(codes, vec!["X954", "J189"]);
    Ok(())
}

/// Test that the histogram shows every age bin and drops unknown codes
#[test]
fn test_age_histogram_bins() -> mortality_dash::Result<()> {
    let data = load_fixture("views-ages")?;

    let result = build_view(&data, ViewKind::AgeHistogram, &ViewFilters::default())?;
    assert_eq!(result.data.len(), 18);
    assert_eq!(keys(&result).first().copied(), Some("0-4"));
    assert_eq!(keys(&result).last().copied(), Some("85+"));
    assert_eq!(result.data.value_of(&["0-4"]), Some(1));
    assert_eq!(result.data.value_of(&["25-29"]), Some(2));
    assert_eq!(result.data.value_of(&["85+"]), Some(2));
    assert_eq!(result.total(), 5);

    let march = build_view(
        &data,
        ViewKind::AgeHistogram,
        &ViewFilters::default().with(FilterKind::Month, "Marzo"),
    )?;
    assert_eq!(march.total(), 2);
    Ok(())
}

/// Test the department and sex breakdown ordering
#[test]
fn test_deaths_by_sex_orders_departments() -> mortality_dash::Result<()> {
    let data = load_fixture("views-sex")?;

    let result = build_view(&data, ViewKind::DeathsBySex, &ViewFilters::default())?;
    let ViewBody::Figure { figure } = &result.body else {
        panic!("sex view should be a figure");
    };
    assert_eq!(
        figure["layout"]["yaxis"]["categoryarray"],
        serde_json::json!(["ANTIOQUIA", "VALLE DEL CAUCA", "BOGOTÁ, D.C.", "NARIÑO"])
    );
    assert_eq!(figure["layout"]["barmode"], "stack");

    let traces = figure["data"].as_array().expect("traces");
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0]["name"], "Femenino");
    assert_eq!(traces[0]["x"], serde_json::json!([200, 40, 0, 25]));
    Ok(())
}

/// Test that a filter matching nothing renders an empty view instead of failing
#[test]
fn test_filters_matching_nothing_give_empty_views() -> mortality_dash::Result<()> {
    let data = load_fixture("views-empty")?;
    let nothing = ViewFilters::default()
        .with(FilterKind::Month, "Noviembre")
        .with(FilterKind::Sex, "Indeterminado")
        .with(FilterKind::Manner, "Desconocida");

    for view in ViewKind::TOUR {
        let result = build_view(&data, view, &nothing)?;
        assert_eq!(result.total(), 0, "{view} should be empty");
    }
    Ok(())
}
