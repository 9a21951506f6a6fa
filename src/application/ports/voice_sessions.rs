//! Voice Session Port - 跨请求的音色延续
//!
//! 调用方用 session id 保留一份 VoiceRegistry，后续请求沿用同一套说话人音色。
//! 具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::voice::VoiceRegistry;

/// Voice Session 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Invalid session id: {0:?}")]
    InvalidId(String),
}

/// 音色会话（in-memory）
#[derive(Debug, Clone)]
pub struct VoiceSession {
    pub id: String,
    pub registry: Arc<VoiceRegistry>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl VoiceSession {
    pub fn new(id: impl Into<String>, registry: Arc<VoiceRegistry>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            registry,
            created_at: now,
            last_activity: now,
        }
    }
}

/// Voice Session Port
pub trait VoiceSessionPort: Send + Sync {
    /// 获取会话的 registry，不存在时新建
    fn get_or_create(&self, id: &str) -> Result<Arc<VoiceRegistry>, SessionError>;

    /// 获取会话
    fn get(&self, id: &str) -> Result<VoiceSession, SessionError>;

    /// 更新最后活动时间
    fn touch(&self, id: &str);

    /// 关闭会话
    fn close(&self, id: &str) -> Result<(), SessionError>;

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;
}
