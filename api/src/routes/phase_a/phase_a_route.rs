use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use phase_a::{InMemoryContent, PhaseAResult};
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::phase_a::phase_a_request::PhaseARequest,
};

/// POST /phase_a
///
/// Runs Phase A over the posted diff, reading file contents from the request.
#[instrument(name = "phase_a_route", skip_all)]
pub async fn phase_a_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PhaseARequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<PhaseAResult>>> {
    let Json(body) = payload?;
    info!(
        diff_bytes = body.diff.len(),
        files = body.files.len(),
        "phase_a requested"
    );

    let contents = InMemoryContent::new(body.files);
    let result = state.orchestrator.run(&body.diff, &contents).await;

    Ok(Json(ApiResponse::success(result)))
}
