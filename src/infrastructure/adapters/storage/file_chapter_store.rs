//! File Chapter Store - 文件系统章节音频存储
//!
//! 目录布局: `{base_dir}/{run_id}/chapter_{ordinal}.{extension}`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ChapterAudioStorePort, ChapterStoreError};

/// 文件系统章节音频存储
pub struct FileChapterStore {
    /// 存储根目录
    base_dir: PathBuf,
    /// 文件扩展名（与 TTS 后端的输出编码一致）
    extension: String,
}

impl FileChapterStore {
    pub async fn new(
        base_dir: impl AsRef<Path>,
        extension: impl Into<String>,
    ) -> Result<Self, ChapterStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ChapterStoreError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            extension: extension.into().trim_start_matches('.').to_string(),
        })
    }

    fn run_dir(&self, run_id: Uuid) -> PathBuf {
        self.base_dir.join(run_id.to_string())
    }

    fn chapter_path(&self, run_id: Uuid, ordinal: u32) -> PathBuf {
        self.run_dir(run_id)
            .join(format!("chapter_{}.{}", ordinal, self.extension))
    }
}

#[async_trait]
impl ChapterAudioStorePort for FileChapterStore {
    async fn save_chapter(
        &self,
        run_id: Uuid,
        ordinal: u32,
        data: &[u8],
    ) -> Result<PathBuf, ChapterStoreError> {
        fs::create_dir_all(self.run_dir(run_id))
            .await
            .map_err(|e| ChapterStoreError::IoError(e.to_string()))?;

        let path = self.chapter_path(run_id, ordinal);
        fs::write(&path, data)
            .await
            .map_err(|e| ChapterStoreError::IoError(e.to_string()))?;

        tracing::debug!(
            run_id = %run_id,
            ordinal = ordinal,
            size = data.len(),
            path = %path.display(),
            "Saved chapter audio"
        );

        Ok(path)
    }
}
