//! Narration Event Sink Port - 合成过程事件
//!
//! 片段跳过不会中断整章，但必须可观测；具体推送方式由基础设施层实现

use uuid::Uuid;

use crate::application::pipeline::SkipReason;

/// Narration Event Sink
pub trait NarrationEventSink: Send + Sync {
    /// 片段合成成功
    fn segment_ready(&self, run_id: Uuid, span_index: usize, audio_bytes: usize);

    /// 片段被跳过
    fn segment_skipped(&self, run_id: Uuid, span_index: usize, reason: &SkipReason);

    /// 整章完成（可能有部分片段被跳过）
    fn chapter_finished(&self, run_id: Uuid, total: usize, skipped: usize);

    /// 整章失败
    fn chapter_failed(&self, run_id: Uuid, error: &str);
}
