//! Latest sample handler.

use axum::Json;
use axum::extract::State;

use crate::dto::LatestSampleDto;
use crate::error::HttpError;
use crate::state::AppState;

/// `GET /v1/`: the most recent sample.
pub async fn latest(State(state): State<AppState>) -> Result<Json<LatestSampleDto>, HttpError> {
    state
        .latest
        .get()
        .map(|sample| Json(LatestSampleDto::from(&sample)))
        .ok_or(HttpError::NoData)
}
