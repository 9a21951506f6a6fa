//! Application State

use std::sync::Arc;

use crate::application::ports::{TtsEnginePort, VoiceSessionPort};
use crate::application::{NarrateChapterHandler, NarrateSeriesHandler};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub tts_engine: Arc<dyn TtsEnginePort>,
    pub voice_sessions: Arc<dyn VoiceSessionPort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub narrate_handler: Arc<NarrateChapterHandler>,
    pub series_handler: NarrateSeriesHandler,

    /// 返回音频时使用的 Content-Type
    pub audio_content_type: String,
}

impl AppState {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        voice_sessions: Arc<dyn VoiceSessionPort>,
        event_publisher: Arc<EventPublisher>,
        narrate_handler: Arc<NarrateChapterHandler>,
        series_handler: NarrateSeriesHandler,
    ) -> Self {
        Self {
            tts_engine,
            voice_sessions,
            event_publisher,
            narrate_handler,
            series_handler,
            audio_content_type: "audio/mpeg".to_string(),
        }
    }

    pub fn with_audio_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.audio_content_type = content_type.into();
        self
    }
}

/// 由文件扩展名推断音频 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "opus" => "audio/ogg",
        "webm" => "audio/webm",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}
