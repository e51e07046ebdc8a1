//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::model::kpi::{KpiPanel, Projection};

/// Projection for one participation value plus its rounded display text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    /// Participation the figures were computed for, after parsing.
    pub participation_pct: i64,
    pub projection: Projection,
    /// Values exactly as the KPI panel shows them.
    pub display: KpiPanel,
}

impl ProjectionResponse {
    pub fn new(projection: Projection) -> Self {
        let mut display = KpiPanel::default();
        display.update(&projection);
        Self {
            participation_pct: projection.participation_pct,
            projection,
            display,
        }
    }
}

/// Query for `/projection`. The value is parsed leniently.
#[derive(Debug, Deserialize)]
pub struct ProjectionQuery {
    pub participation: Option<String>,
}

/// Query for `/curves` and `/chart`.
#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    pub seed: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
