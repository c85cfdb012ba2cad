use crate::utils::{load_fixture, utf8_batch};
use mortality_dash::schema::adapt::adapt_record_batch;
use mortality_dash::schema::{MES_NOMBRE, MUERTES, MUNICIPIO, SEXO};
use mortality_dash::{AggregateQuery, Constraint, FilterKind, TableKind, apply_constraints, group_sum};

/// Test that no constraint set can raise the total above the unfiltered total
#[test]
fn test_filtered_totals_never_exceed_unfiltered() -> mortality_dash::Result<()> {
    let data = load_fixture("aggregate-totals")?;
    let table = data.table(TableKind::Municipality)?;

    let unfiltered = AggregateQuery::new(MUERTES).group_by([MUNICIPIO]).execute(table)?;
    // 120 + 40 + 100 + 150 + 30 + 90 + 95 + 5 + 0 + 2
    assert_eq!(unfiltered.total(), 632);

    let unset = AggregateQuery::new(MUERTES)
        .filter(MES_NOMBRE, None)
        .filter(SEXO, Some("Todos"))
        .group_by([MUNICIPIO])
        .execute(table)?;
    assert_eq!(unset, unfiltered);

    let months = data.options(TableKind::Municipality, FilterKind::Month).to_vec();
    let sexes = data.options(TableKind::Municipality, FilterKind::Sex).to_vec();
    for month in &months {
        for sex in &sexes {
            let filtered = AggregateQuery::new(MUERTES)
                .filter(MES_NOMBRE, Some(month.as_str()))
                .filter(SEXO, Some(sex.as_str()))
                .group_by([MUNICIPIO])
                .execute(table)?;
            assert!(
                filtered.total() <= unfiltered.total(),
                "{month}/{sex} total {} exceeds {}",
                filtered.total(),
                unfiltered.total()
            );
        }
    }
    Ok(())
}

/// Test that narrowing in two steps gives the same groups as one combined filter
#[test]
fn test_sequential_filters_match_combined() -> mortality_dash::Result<()> {
    let data = load_fixture("aggregate-sequential")?;
    let table = data.table(TableKind::Municipality)?;

    let combined = AggregateQuery::new(MUERTES)
        .filter(MES_NOMBRE, Some("Enero"))
        .filter(SEXO, Some("Masculino"))
        .group_by([MUNICIPIO])
        .execute(table)?;

    let january = apply_constraints(table, &[Constraint::new(MES_NOMBRE, Some("Enero"))])?;
    let sequential = AggregateQuery::new(MUERTES)
        .filter(SEXO, Some("Masculino"))
        .group_by([MUNICIPIO])
        .execute(&january)?;

    assert_eq!(combined, sequential);
    assert_eq!(combined.value_of(&["Cali"]), Some(150));
    assert_eq!(combined.value_of(&["Medellín"]), Some(120));
    assert_eq!(combined.value_of(&["Pasto"]), None);
    Ok(())
}

/// Test that top-K and bottom-K selections do not overlap
#[test]
fn test_top_and_bottom_are_disjoint() -> mortality_dash::Result<()> {
    let data = load_fixture("aggregate-disjoint")?;
    let table = data.table(TableKind::Municipality)?;

    let all = group_sum(table, &[MUNICIPIO], MUERTES)?;
    assert_eq!(all.len(), 5);

    let top = AggregateQuery::new(MUERTES).group_by([MUNICIPIO]).top(2).execute(table)?;
    let bottom = AggregateQuery::new(MUERTES).group_by([MUNICIPIO]).bottom(3).execute(table)?;

    for row in &top.rows {
        assert!(bottom.rows.iter().all(|other| other.keys != row.keys));
    }
    assert!(top.min_value() >= bottom.max_value());

    let top_keys: Vec<&str> = top.rows.iter().map(|r| r.key()).collect();
    let bottom_keys: Vec<&str> = bottom.rows.iter().map(|r| r.key()).collect();
    assert_eq!(top_keys, vec!["Medellín", "Bogotá D.C."]);
    assert_eq!(bottom_keys, vec!["Leticia", "Pasto", "Cali"]);
    Ok(())
}

/// Test that equal measures are ranked by key, every time
#[test]
fn test_ties_are_broken_by_key() -> mortality_dash::Result<()> {
    let raw = utf8_batch(
        &["MUNICIPIO", "MES", "SEXO", "Muertes"],
        &[
            &[Some("Tumaco"), Some("1"), Some("Masculino"), Some("7")],
            &[Some("Arauca"), Some("1"), Some("Masculino"), Some("7")],
            &[Some("Yopal"), Some("1"), Some("Masculino"), Some("7")],
            &[Some("Quibdó"), Some("1"), Some("Masculino"), Some("1")],
        ],
    );
    let (table, _) = adapt_record_batch(TableKind::Municipality, &raw)?;

    for _ in 0..3 {
        let top = AggregateQuery::new(MUERTES).group_by([MUNICIPIO]).top(2).execute(&table)?;
        let keys: Vec<&str> = top.rows.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!["Arauca", "Tumaco"]);
    }
    Ok(())
}

/// Test that an empty table aggregates to an empty result under any filter
#[test]
fn test_empty_table_gives_empty_result() -> mortality_dash::Result<()> {
    let raw = utf8_batch(&["MUNICIPIO", "MES", "SEXO", "Muertes"], &[]);
    let (table, _) = adapt_record_batch(TableKind::Municipality, &raw)?;

    let grouped = AggregateQuery::new(MUERTES)
        .filter(MES_NOMBRE, Some("Enero"))
        .filter(SEXO, Some("Femenino"))
        .group_by([MUNICIPIO])
        .bottom(10)
        .execute(&table)?;
    assert!(grouped.is_empty());
    assert_eq!(grouped.total(), 0);
    Ok(())
}
