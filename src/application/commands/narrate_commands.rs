//! Narrate Commands - 单章朗读

use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::pipeline::SkipReason;
use crate::domain::voice::VoiceRegistry;

/// 朗读一章文本
#[derive(Debug, Clone)]
pub struct NarrateChapter {
    pub text: String,
    /// 目标语言，设置后先整章翻译
    pub translate: Option<String>,
    /// 传入已有 registry 可延续说话人音色，不传则新建
    pub registry: Option<Arc<VoiceRegistry>>,
    pub cancel: Option<CancellationToken>,
}

impl NarrateChapter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translate: None,
            registry: None,
            cancel: None,
        }
    }

    pub fn with_translation(mut self, target_lang: impl Into<String>) -> Self {
        self.translate = Some(target_lang.into());
        self
    }

    pub fn with_registry(mut self, registry: Arc<VoiceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// 被跳过的片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSpan {
    pub index: usize,
    pub reason: SkipReason,
}

/// 朗读完成度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NarrationStatus {
    Complete,
    Partial { skipped: usize, total: usize },
}

/// 朗读结果
#[derive(Debug, Clone)]
pub struct NarrationReport {
    pub run_id: Uuid,
    pub audio: Vec<u8>,
    pub total_spans: usize,
    pub synthesized: usize,
    pub skipped: Vec<SkippedSpan>,
}

impl NarrationReport {
    pub fn status(&self) -> NarrationStatus {
        if self.skipped.is_empty() {
            NarrationStatus::Complete
        } else {
            NarrationStatus::Partial {
                skipped: self.skipped.len(),
                total: self.total_spans,
            }
        }
    }
}
