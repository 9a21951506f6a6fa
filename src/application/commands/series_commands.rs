//! Series Commands - 连续章节朗读

use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// 从某一章开始连续朗读
#[derive(Debug, Clone)]
pub struct NarrateSeries {
    pub start_url: String,
    /// 覆盖配置中的最大章节数
    pub max_chapters: Option<u32>,
    pub translate: Option<String>,
}

impl NarrateSeries {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_chapters: None,
            translate: None,
        }
    }
}

/// 单章处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChapterResult {
    Narrated {
        path: PathBuf,
        total_spans: usize,
        skipped: usize,
    },
    Failed {
        error: String,
    },
}

/// 单章记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterOutcome {
    /// 从 1 开始
    pub ordinal: u32,
    pub url: String,
    pub title: String,
    pub result: ChapterResult,
}

/// 停止原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// 达到章节上限
    MaxChapters,
    /// 标题显示已不是同一部小说
    DifferentNovel { title: String },
    /// URL 中没有可递增的章节号
    NoNextUrl,
    /// 获取章节失败
    FetchFailed { url: String, error: String },
}

/// 连续朗读报告
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub run_id: Uuid,
    pub chapters: Vec<ChapterOutcome>,
    pub stop_reason: StopReason,
}

impl SeriesReport {
    pub fn narrated(&self) -> usize {
        self.chapters
            .iter()
            .filter(|c| matches!(c.result, ChapterResult::Narrated { .. }))
            .count()
    }
}
