//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、Translator、ChapterSource 等）
//! - pipeline: 合成任务、有界并发调度、拼接
//! - commands: 单章/连续章节朗读命令及处理器
//! - voices: VoiceRegistry 工厂
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod voices;

pub use commands::{
    handlers::{NarrateChapterHandler, NarrateSeriesHandler, SeriesConfig},
    ChapterOutcome, ChapterResult, NarrateChapter, NarrateSeries, NarrationReport,
    NarrationStatus, SeriesReport, SkippedSpan, StopReason,
};
pub use error::NarrationError;
pub use pipeline::{SchedulerConfig, SkipReason, SynthesisScheduler};
pub use voices::RegistryFactory;
