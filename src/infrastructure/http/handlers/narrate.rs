//! Narrate Handler - 单章朗读，直接返回音频

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::NarrateChapter;
use crate::infrastructure::http::dto::NarrateRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const RUN_ID_HEADER: &str = "x-narration-run-id";
pub const TOTAL_HEADER: &str = "x-narration-total";
pub const SKIPPED_HEADER: &str = "x-narration-skipped";

pub async fn narrate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NarrateRequest>,
) -> Result<Response, ApiError> {
    let mut cmd = NarrateChapter::new(req.text);
    cmd.translate = req.translate;

    if let Some(session_id) = &req.session_id {
        cmd = cmd.with_registry(state.voice_sessions.get_or_create(session_id)?);
    }

    let report = state.narrate_handler.handle(cmd).await?;

    if let Some(session_id) = &req.session_id {
        state.voice_sessions.touch(session_id);
    }

    Ok((
        [
            (header::CONTENT_TYPE, state.audio_content_type.clone()),
            (
                header::HeaderName::from_static(RUN_ID_HEADER),
                report.run_id.to_string(),
            ),
            (
                header::HeaderName::from_static(TOTAL_HEADER),
                report.total_spans.to_string(),
            ),
            (
                header::HeaderName::from_static(SKIPPED_HEADER),
                report.skipped.len().to_string(),
            ),
        ],
        report.audio,
    )
        .into_response())
}
