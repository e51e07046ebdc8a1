//! JSON API over the projection engine and the curve generator.
//!
//! Provides three GET endpoints:
//! - `/projection`: KPI projection and display strings for a participation
//! - `/curves`: a set of synthetic 24-hour load curves
//! - `/chart`: the full comparison chart description with data

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

pub use types::{ErrorResponse, ProjectionResponse};

use crate::config::PlannerConfig;

/// Read-only defaults shared by all request handlers.
///
/// Handlers keep no per-request state, so no locks are needed.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Participation used when a request does not give one.
    pub participation_pct: i64,
    /// Seed used when a request does not give one; `None` draws fresh curves.
    pub chart_seed: Option<u64>,
}

impl AppState {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            participation_pct: config.strategy.participation_pct,
            chart_seed: config.chart.seed,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/projection", get(handlers::get_projection))
        .route("/curves", get(handlers::get_curves))
        .route("/chart", get(handlers::get_chart))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
