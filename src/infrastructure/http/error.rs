//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ports::SessionError;
use crate::application::NarrationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const UNPROCESSABLE: i32 = 422;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// 请求合法但内容无法朗读
    Unprocessable(String),
    Internal(String),
    /// 上游服务返回错误
    BadGateway(String),
    ServiceUnavailable(String),
}

impl ApiError {
    fn parts(&self) -> (i32, &str) {
        match self {
            ApiError::NotFound(msg) => (errno::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (errno::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (errno::UNPROCESSABLE, msg),
            ApiError::Internal(msg) => (errno::INTERNAL_ERROR, msg),
            ApiError::BadGateway(msg) => (errno::BAD_GATEWAY, msg),
            ApiError::ServiceUnavailable(msg) => (errno::SERVICE_UNAVAILABLE, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = self.parts();
        if code >= errno::INTERNAL_ERROR {
            tracing::error!(errno = code, error = %msg, "Request failed");
        } else {
            tracing::warn!(errno = code, error = %msg, "Request rejected");
        }

        // 业务错误统一返回 200，错误码放在 errno
        (StatusCode::OK, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<NarrationError> for ApiError {
    fn from(e: NarrationError) -> Self {
        match e {
            NarrationError::EmptyChapter => ApiError::Unprocessable(e.to_string()),
            NarrationError::TranslationUnavailable => ApiError::BadRequest(e.to_string()),
            NarrationError::Translation(_) => ApiError::BadGateway(e.to_string()),
            NarrationError::AllSegmentsFailed { .. } => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => ApiError::NotFound(e.to_string()),
            SessionError::InvalidId(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}
