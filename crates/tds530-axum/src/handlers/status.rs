//! Acquisition status handler.

use axum::Json;
use axum::extract::State;
use tds530_runtime::AcquisitionStatus;

use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Json<AcquisitionStatus> {
    Json(state.status.snapshot())
}
