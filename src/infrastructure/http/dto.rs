//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::narration::SpeakerId;
use crate::domain::voice::{VoiceId, VoiceProfile};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Narration DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NarrateRequest {
    pub text: String,
    /// 目标语言
    #[serde(default)]
    pub translate: Option<String>,
    /// 传入后沿用该会话的说话人音色
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    pub url: String,
    #[serde(default)]
    pub max_chapters: Option<u32>,
    #[serde(default)]
    pub translate: Option<String>,
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub narrator: VoiceId,
    pub pool: Vec<VoiceProfile>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionVoicesResponse {
    pub session_id: String,
    pub assignments: BTreeMap<SpeakerId, VoiceId>,
    pub last_activity: String,
}
