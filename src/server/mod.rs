//! HTTP surface of the dashboard
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | landing page |
//! | `GET /{slug}` | view page, landing page for unknown slugs |
//! | `GET /api/views/{slug}` | [`ViewResult`] as JSON, 404 for unknown slugs |
//! | `GET /api/tour` | navigation order |
//! | `GET /api/boundaries` | department GeoJSON used by the map |

pub mod pages;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::dataset::DashboardData;
use crate::error::{DashboardError, Result};
use crate::views::{ViewFilters, ViewKind, ViewResult, build_view};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DashboardData>,
    boundaries: Bytes,
}

impl AppState {
    /// Wrap loaded data; the boundary document is serialised once here
    pub fn new(data: Arc<DashboardData>) -> Result<Self> {
        let boundaries = Bytes::from(serde_json::to_vec(&data.boundaries().geojson)?);
        Ok(Self { data, boundaries })
    }
}

/// Error returned by the JSON API
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        log::error!("Request failed: {err}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// One stop of the navigation tour
#[derive(Debug, Clone, Serialize)]
pub struct TourStop {
    pub view: ViewKind,
    pub path: &'static str,
    pub title: &'static str,
}

pub async fn landing() -> Html<String> {
    Html(pages::landing_page())
}

/// Page of a view; unknown paths fall back to the landing page
///
/// A query string that does not parse (a repeated parameter, say) is ignored
/// and the page opens unfiltered.
pub async fn view_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Option<Query<ViewFilters>>,
) -> std::result::Result<Html<String>, ApiError> {
    let filters = query.map(|Query(filters)| filters).unwrap_or_default();
    let Some(view) = ViewKind::from_slug(&slug) else {
        log::debug!("Unknown view '{slug}', showing the landing page");
        return Ok(landing().await);
    };
    let result = build_view(&state.data, view, &filters)?;
    Ok(Html(pages::view_page(&state.data, &result, &filters)?))
}

/// Recomputed view as JSON
pub async fn view_api(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(filters): Query<ViewFilters>,
) -> std::result::Result<Json<ViewResult>, ApiError> {
    let view = ViewKind::from_slug(&slug).ok_or_else(|| ApiError::not_found(format!("unknown view '{slug}'")))?;
    Ok(Json(build_view(&state.data, view, &filters)?))
}

pub async fn tour() -> Json<Vec<TourStop>> {
    Json(
        ViewKind::TOUR
            .iter()
            .map(|view| TourStop {
                view: *view,
                path: view.path(),
                title: view.heading(),
            })
            .collect(),
    )
}

pub async fn boundaries(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/geo+json")], state.boundaries.clone())
}

/// The dashboard router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/api/tour", get(tour))
        .route("/api/boundaries", get(boundaries))
        .route("/api/views/:view", get(view_api))
        .route("/:view", get(view_page))
        .fallback(landing)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
