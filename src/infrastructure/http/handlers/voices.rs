//! Voice Handlers - 音色目录与音色会话

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{
    ApiResponse, Empty, SessionRequest, SessionVoicesResponse, VoicesResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<ApiResponse<VoicesResponse>> {
    let catalog = state.narrate_handler.registries().catalog();
    Json(ApiResponse::success(VoicesResponse {
        narrator: catalog.narrator().clone(),
        pool: catalog.pool().to_vec(),
    }))
}

pub async fn session_voices(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionVoicesResponse>>, ApiError> {
    let session = state.voice_sessions.get(&req.session_id)?;
    state.voice_sessions.touch(&req.session_id);

    Ok(Json(ApiResponse::success(SessionVoicesResponse {
        session_id: session.id,
        assignments: session.registry.snapshot(),
        last_activity: session.last_activity.to_rfc3339(),
    })))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state.voice_sessions.close(&req.session_id)?;
    state
        .event_publisher
        .publish_session_closed(&req.session_id, "closed by client");
    Ok(Json(ApiResponse::ok()))
}
