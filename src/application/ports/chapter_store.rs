//! Chapter Audio Store Port - 出站端口
//!
//! 保存连续章节朗读生成的整章音频

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// 章节音频存储错误
#[derive(Debug, Error)]
pub enum ChapterStoreError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Chapter Audio Store Port
#[async_trait]
pub trait ChapterAudioStorePort: Send + Sync {
    /// 保存章节音频（ordinal 从 1 开始），返回写入位置
    async fn save_chapter(
        &self,
        run_id: Uuid,
        ordinal: u32,
        data: &[u8],
    ) -> Result<PathBuf, ChapterStoreError>;
}
