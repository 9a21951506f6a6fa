//! TTS Engine Port - 语音合成后端抽象
//!
//! 外部合成服务被视为不可靠、限流的远程服务，只依赖此契约

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::narration::Prosody;
use crate::domain::voice::VoiceId;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),
}

/// TTS 合成请求
#[derive(Debug, Clone)]
pub struct InferRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 音色
    pub voice_id: VoiceId,
    /// 韵律调整
    pub prosody: Prosody,
    /// 预先渲染好的 SSML（后端支持时使用）
    pub ssml: Option<String>,
}

/// TTS 合成响应
#[derive(Debug, Clone)]
pub struct InferResponse {
    /// 原始音频数据（后端原生编码）
    pub audio_data: Vec<u8>,
    /// 后端声明的内容类型
    pub content_type: Option<String>,
}

/// TTS Engine Port
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成一段文本
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError>;

    /// 检查 TTS 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
