//! Event Publisher Implementation
//!
//! 通过 broadcast 通道向 WebSocket 订阅者推送朗读事件

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::application::pipeline::SkipReason;
use crate::application::ports::NarrationEventSink;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum NarrationEvent {
    /// 片段合成成功
    SegmentReady {
        run_id: Uuid,
        span_index: usize,
        audio_bytes: usize,
    },
    /// 片段被跳过
    SegmentSkipped {
        run_id: Uuid,
        span_index: usize,
        reason: String,
    },
    /// 整章完成
    ChapterFinished {
        run_id: Uuid,
        total: usize,
        skipped: usize,
    },
    /// 整章失败
    ChapterFailed { run_id: Uuid, error: String },
    /// 音色会话关闭
    SessionClosed { session_id: String, reason: String },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<NarrationEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全部事件
    pub fn subscribe(&self) -> broadcast::Receiver<NarrationEvent> {
        self.channel.subscribe()
    }

    /// 发布会话关闭事件
    pub fn publish_session_closed(&self, session_id: &str, reason: &str) {
        self.publish(NarrationEvent::SessionClosed {
            session_id: session_id.to_string(),
            reason: reason.to_string(),
        });
    }

    fn publish(&self, event: NarrationEvent) {
        // 没有订阅者时 send 返回错误，属于正常情况
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Event dropped (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrationEventSink for EventPublisher {
    fn segment_ready(&self, run_id: Uuid, span_index: usize, audio_bytes: usize) {
        self.publish(NarrationEvent::SegmentReady {
            run_id,
            span_index,
            audio_bytes,
        });
    }

    fn segment_skipped(&self, run_id: Uuid, span_index: usize, reason: &SkipReason) {
        self.publish(NarrationEvent::SegmentSkipped {
            run_id,
            span_index,
            reason: reason.to_string(),
        });
    }

    fn chapter_finished(&self, run_id: Uuid, total: usize, skipped: usize) {
        self.publish(NarrationEvent::ChapterFinished {
            run_id,
            total,
            skipped,
        });
    }

    fn chapter_failed(&self, run_id: Uuid, error: &str) {
        self.publish(NarrationEvent::ChapterFailed {
            run_id,
            error: error.to_string(),
        });
    }
}
