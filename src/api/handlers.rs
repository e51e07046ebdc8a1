//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, ProjectionQuery, ProjectionResponse, SeedQuery};
use crate::model::curve::{LoadCurveGenerator, LoadCurves};
use crate::model::kpi::{DEFAULT_PARTICIPATION_PCT, project_participation};
use crate::wizard::binder::parse_int_prefix;
use crate::wizard::chart::ChartSpec;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Returns the projection for the requested participation.
///
/// `GET /projection` → configured participation
/// `GET /projection?participation=N` → leading integer of N, or 30 when it has none
pub async fn get_projection(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectionQuery>,
) -> Json<ProjectionResponse> {
    let participation = query.participation.as_deref().map_or(state.participation_pct, |raw| {
        parse_int_prefix(raw).unwrap_or(DEFAULT_PARTICIPATION_PCT)
    });
    Json(ProjectionResponse::new(project_participation(participation)))
}

/// Returns freshly drawn load curves.
///
/// `GET /curves?seed=S` → reproducible for the same S
/// `GET /curves?seed=abc` → 400 + `ErrorResponse`
pub async fn get_curves(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeedQuery>,
) -> impl IntoResponse {
    draw_curves(&state, &query).map(Json)
}

/// Returns the comparison chart description with freshly drawn data.
///
/// `GET /chart?seed=S` → 200 + `ChartSpec` JSON
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeedQuery>,
) -> impl IntoResponse {
    draw_curves(&state, &query).map(|curves| Json(ChartSpec::load_comparison(&curves)))
}

fn draw_curves(state: &AppState, query: &SeedQuery) -> Result<LoadCurves, ApiError> {
    let seed = match query.seed.as_deref() {
        Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("`seed` must be an unsigned integer, got \"{raw}\""),
                }),
            )
        })?),
        None => state.chart_seed,
    };
    Ok(LoadCurveGenerator::from_seed_option(seed).generate())
}
