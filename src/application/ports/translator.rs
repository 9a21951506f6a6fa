//! Translator Port - 整章翻译

use async_trait::async_trait;
use thiserror::Error;

/// 翻译错误
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Translator Port
///
/// 在分段之前对整章文本做翻译
#[async_trait]
pub trait TranslatorPort: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}
