//! 应用层错误定义

use thiserror::Error;

use crate::application::pipeline::AssemblyError;
use crate::application::ports::TranslateError;

/// 整章朗读错误
///
/// 单个片段的失败不会出现在这里，只有整章没有任何可用音频时才算失败
#[derive(Debug, Error)]
pub enum NarrationError {
    /// 分段后没有任何可朗读的文本
    #[error("Chapter has no narratable text")]
    EmptyChapter,

    /// 请求了翻译但没有配置翻译服务
    #[error("Translation requested but no translator is configured")]
    TranslationUnavailable,

    /// 翻译失败
    #[error("Translation failed: {0}")]
    Translation(#[from] TranslateError),

    /// 所有片段都合成失败
    #[error("All {total} segments failed ({skipped} skipped)")]
    AllSegmentsFailed { total: usize, skipped: usize },
}

impl From<AssemblyError> for NarrationError {
    fn from(err: AssemblyError) -> Self {
        match err {
            AssemblyError::AllSegmentsFailed { total, skipped } => {
                Self::AllSegmentsFailed { total, skipped }
            }
        }
    }
}
