//! Series Handler - 连续章节朗读

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{NarrateSeries, SeriesReport};
use crate::infrastructure::http::dto::{ApiResponse, SeriesRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn narrate_series(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeriesRequest>,
) -> Result<Json<ApiResponse<SeriesReport>>, ApiError> {
    let url = req.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ApiError::BadRequest(format!("Invalid chapter URL: {}", req.url)));
    }

    let cmd = NarrateSeries {
        start_url: url.to_string(),
        max_chapters: req.max_chapters,
        translate: req.translate,
    };

    let report = state.series_handler.handle(cmd).await;
    Ok(Json(ApiResponse::success(report)))
}
