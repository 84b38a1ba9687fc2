//! Batch pipeline handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;

use supportflow_core::BatchSummary;

use super::tickets::ErrorBody;
use crate::state::AppState;

/// Request body for a batch run
#[derive(Debug, Deserialize)]
pub struct RunBatchBody {
    /// Number of queries to sample from the dataset.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

/// Sample queries from the dataset and run the full pipeline for each.
pub async fn run_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RunBatchBody>,
) -> Result<Json<BatchSummary>, (StatusCode, Json<ErrorBody>)> {
    state.batch().run(body.count).await.map(Json).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
    })
}
