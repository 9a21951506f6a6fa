//! Voice Context - Errors

use thiserror::Error;

use super::VoiceId;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("无效的音色目录: {0}")]
    InvalidCatalog(String),

    #[error("旁白音色不能出现在可分配音色池中: {0}")]
    NarratorInPool(VoiceId),

    #[error("音色重复: {0}")]
    DuplicateVoice(VoiceId),
}
