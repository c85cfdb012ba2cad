use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::Value;
use tower::ServiceExt;

use crate::utils::load_fixture;
use mortality_dash::server::{boundaries, landing, tour, view_api, view_page};
use mortality_dash::views::DASHBOARD_TITLE;
use mortality_dash::{AppState, FilterKind, ViewFilters, router};

fn state(name: &str) -> AppState {
    let data = load_fixture(name).expect("fixture loads");
    AppState::new(Arc::new(data)).expect("state builds")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    app.clone().oneshot(request).await.expect("infallible router")
}

/// Test that requests reach the right handler through the router
#[tokio::test]
async fn test_router_dispatches_paths() {
    let app = router(state("server-router"));

    let page = get(&app, "/mapa").await;
    assert_eq!(page.status(), StatusCode::OK);
    let html = body_text(page).await;
    assert!(html.contains("data-filter"));
    assert!(html.contains("name=\"sexo\""));

    for uri in ["/", "/a/b/c", "/no-existe"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let html = body_text(response).await;
        assert!(html.contains(DASHBOARD_TITLE), "{uri}");
        assert!(!html.contains("data-filter"), "{uri}");
    }

    let api = get(&app, "/api/views/mapa?sexo=Femenino&manera=Homicidio").await;
    assert_eq!(api.status(), StatusCode::OK);
    let json = body_json(api).await;
    assert_eq!(json["view"], "mapa");
    assert_eq!(json["body"]["type"], "figure");
    assert_eq!(json["body"]["figure"]["data"][0]["zmax"], 40);

    let missing = get(&app, "/api/views/nope").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_json(missing).await["error"].as_str().is_some_and(|e| e.contains("nope")));

    let tour = get(&app, "/api/tour").await;
    assert_eq!(body_json(tour).await.as_array().map(Vec::len), Some(7));
}

/// Test that a query string which does not parse still renders the page
#[tokio::test]
async fn test_repeated_query_parameter_is_ignored_on_pages() {
    let app = router(state("server-repeated-query"));

    let unknown = get(&app, "/no-existe?mes=1&mes=2").await;
    assert_eq!(unknown.status(), StatusCode::OK);
    assert!(body_text(unknown).await.contains(DASHBOARD_TITLE));

    let known = get(&app, "/muerte-por-mes?sexo=Masculino&sexo=Femenino").await;
    assert_eq!(known.status(), StatusCode::OK);
    let html = body_text(known).await;
    assert!(html.contains("name=\"sexo\""));
    assert!(html.contains("<option value=\"\" selected>Todos</option>"));
}

/// Test the landing page
#[tokio::test]
async fn test_landing_page() {
    let page = landing().await.0;
    assert!(page.contains(DASHBOARD_TITLE));
    assert!(page.contains("href=\"/mapa\""));
}

/// Test that unknown paths render the landing page
#[tokio::test]
async fn test_unknown_path_renders_landing() {
    let state = state("server-unknown-page");
    let page = view_page(State(state), Path("no-existe".to_string()), None)
        .await
        .expect("landing page");
    assert!(page.0.contains(DASHBOARD_TITLE));
    assert!(!page.0.contains("data-filter"));
}

/// Test a view page with a preselected dropdown
#[tokio::test]
async fn test_view_page_has_filters_and_navigation() {
    let state = state("server-view-page");
    let filters = ViewFilters::default().with(FilterKind::Month, "Enero");
    let page = view_page(State(state), Path("ciudades-mas-violentas".to_string()), Some(Query(filters)))
        .await
        .expect("view page")
        .0;

    assert!(page.contains("TOP 5 Ciudades más violentas de Colombia"));
    assert!(page.contains("name=\"mes\""));
    assert!(page.contains("name=\"sexo\""));
    assert!(page.contains("<option value=\"Enero\" selected>Enero</option>"));
    assert!(page.contains("href=\"/muerte-por-mes\""));
    assert!(page.contains("href=\"/indice-mortalidad\""));
    assert!(page.contains("plotly"));
}

/// Test the cause table page renders its rows on the server
#[tokio::test]
async fn test_cause_page_renders_table() {
    let state = state("server-cause-page");
    let page = view_page(
        State(state),
        Path("tabla-causas-muertes".to_string()),
        Some(Query(ViewFilters::default())),
    )
    .await
    .expect("cause page")
    .0;

    assert!(page.contains("<th>Código</th>"));
    assert!(page.contains("<td>X954</td>"));
    assert!(page.contains("name=\"municipio\""));
}

/// Test the JSON view API
#[tokio::test]
async fn test_view_api_returns_figure() {
    let state = state("server-api");
    let filters = ViewFilters::default().with(FilterKind::Sex, "Masculino");
    let response = view_api(State(state), Path("muerte-por-mes".to_string()), Query(filters))
        .await
        .expect("known view")
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["view"], "muerte-por-mes");
    assert_eq!(json["body"]["type"], "figure");
    assert_eq!(json["body"]["figure"]["data"][0]["x"], serde_json::json!(["Enero", "Febrero", "Diciembre"]));
    assert_eq!(json["body"]["figure"]["data"][0]["y"], serde_json::json!([10, 12, 4]));
}

/// Test that an unknown view is a 404 with a JSON error
#[tokio::test]
async fn test_view_api_unknown_view_is_not_found() {
    let state = state("server-api-unknown");
    let error = view_api(State(state), Path("portada".to_string()), Query(ViewFilters::default()))
        .await
        .expect_err("unknown view");
    assert_eq!(error.status(), StatusCode::NOT_FOUND);

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().is_some_and(|e| e.contains("portada")));
}

/// Test the tour and boundary endpoints
#[tokio::test]
async fn test_tour_and_boundaries() {
    let stops = tour().await.0;
    let paths: Vec<&str> = stops.iter().map(|stop| stop.path).collect();
    assert_eq!(
        paths,
        vec![
            "/mapa",
            "/muerte-por-mes",
            "/ciudades-mas-violentas",
            "/indice-mortalidad",
            "/tabla-causas-muertes",
            "/histograma-mortalidad",
            "/muertes-por-sexo",
        ]
    );

    let state = state("server-boundaries");
    let response = boundaries(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/geo+json")
    );
    let json = body_json(response).await;
    assert_eq!(json["features"][1]["id"], "VALLE DEL CAUCA");
}
