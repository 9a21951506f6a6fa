//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping               GET   健康检查
//! - /api/narrate            POST  朗读一章文本，返回音频
//! - /api/series             POST  从章节 URL 开始连续朗读
//! - /api/voices             GET   音色目录
//! - /api/session/voices     POST  查看会话内的说话人音色
//! - /api/session/close      POST  关闭音色会话
//! - /ws/events              WS    朗读事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/narrate", post(handlers::narrate))
        .route("/series", post(handlers::narrate_series))
        .route("/voices", get(handlers::list_voices))
        .nest("/session", session_routes())
}

/// Session 路由
fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/voices", post(handlers::session_voices))
        .route("/close", post(handlers::close_session))
}
