//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod chapter_source;
mod chapter_store;
mod event_sink;
mod translator;
mod tts_engine;
mod voice_sessions;

pub use chapter_source::{Chapter, ChapterSourcePort, FetchError};
pub use chapter_store::{ChapterAudioStorePort, ChapterStoreError};
pub use event_sink::NarrationEventSink;
pub use translator::{TranslateError, TranslatorPort};
pub use tts_engine::{InferRequest, InferResponse, TtsEnginePort, TtsError};
pub use voice_sessions::{SessionError, VoiceSession, VoiceSessionPort};
