//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::{SchedulerConfig, SeriesConfig};
use crate::domain::narration::{AttributionConfig, SegmentConfig};
use crate::domain::voice::{Gender, VoiceCatalog, VoiceError, VoiceId, VoiceProfile};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub scheduler: SchedulerSettings,

    #[serde(default)]
    pub voices: VoicesConfig,

    #[serde(default)]
    pub narration: NarrationConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub chapters: ChaptersConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 构造音色目录（校验旁白不在池中、池非空且无重复）
    pub fn catalog(&self) -> Result<VoiceCatalog, VoiceError> {
        VoiceCatalog::new(
            VoiceId::new(self.voices.narrator.clone()),
            self.voices.pool.clone(),
        )
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            max_concurrent: self.scheduler.max_concurrent,
            max_retries: self.scheduler.max_retries,
            job_timeout: Duration::from_secs(self.scheduler.job_timeout_secs),
            min_audio_bytes: self.scheduler.min_audio_bytes,
            use_ssml: self.tts.ssml,
        }
    }

    pub fn segment_config(&self) -> SegmentConfig {
        SegmentConfig {
            max_span_chars: self.narration.max_span_chars,
        }
    }

    pub fn attribution_config(&self) -> AttributionConfig {
        AttributionConfig {
            classify_narration: self.narration.classify_narration,
        }
    }

    pub fn series_config(&self) -> SeriesConfig {
        SeriesConfig {
            max_chapters: self.chapters.max_chapters,
            delay: Duration::from_millis(self.chapters.delay_ms),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 后端类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsBackend {
    #[default]
    Http,
    /// 本地生成确定性字节，用于联调
    Fake,
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub backend: TtsBackend,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 是否发送 SSML
    #[serde(default)]
    pub ssml: bool,
}

fn default_tts_url() -> String {
    "http://localhost:5050".to_string()
}

fn default_tts_timeout() -> u64 {
    60
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            backend: TtsBackend::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            ssml: false,
        }
    }
}

/// 合成调度配置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// 最大并发合成数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 失败后额外重试次数（最多 3）
    #[serde(default)]
    pub max_retries: u32,

    /// 单个片段超时（秒）
    #[serde(default = "default_job_timeout")]
    pub job_timeout_secs: u64,

    /// 音频最小字节数
    #[serde(default = "default_min_audio_bytes")]
    pub min_audio_bytes: usize,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_job_timeout() -> u64 {
    90
}

fn default_min_audio_bytes() -> usize {
    256
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            max_retries: 0,
            job_timeout_secs: default_job_timeout(),
            min_audio_bytes: default_min_audio_bytes(),
        }
    }
}

/// 音色配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    /// 旁白音色
    #[serde(default = "default_narrator")]
    pub narrator: String,

    /// 可分配给角色的音色池
    #[serde(default = "default_pool")]
    pub pool: Vec<VoiceProfile>,

    /// 是否根据说话人称谓选择同性别音色
    #[serde(default)]
    pub gender_aware: bool,
}

fn default_narrator() -> String {
    "en-US-GuyNeural".to_string()
}

fn default_pool() -> Vec<VoiceProfile> {
    [
        ("en-US-AriaNeural", Gender::Female),
        ("en-US-JennyNeural", Gender::Female),
        ("en-GB-SoniaNeural", Gender::Female),
        ("en-US-MichelleNeural", Gender::Female),
        ("en-US-ChristopherNeural", Gender::Male),
        ("en-US-EricNeural", Gender::Male),
        ("en-GB-RyanNeural", Gender::Male),
        ("en-US-RogerNeural", Gender::Male),
    ]
    .into_iter()
    .map(|(id, gender)| VoiceProfile::new(id, Some(gender)))
    .collect()
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            narrator: default_narrator(),
            pool: default_pool(),
            gender_aware: false,
        }
    }
}

/// 分段与归属配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NarrationConfig {
    /// 旁白片段最大字符数，不设置则按段落
    #[serde(default)]
    pub max_span_chars: Option<usize>,

    /// 旁白是否也做情感识别
    #[serde(default)]
    pub classify_narration: bool,
}

/// 翻译服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub url: String,

    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_timeout() -> u64 {
    30
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

/// 连续章节配置
#[derive(Debug, Clone, Deserialize)]
pub struct ChaptersConfig {
    #[serde(default = "default_max_chapters")]
    pub max_chapters: u32,

    /// 两章之间的等待（毫秒）
    #[serde(default = "default_chapter_delay")]
    pub delay_ms: u64,

    /// 抓取超时（秒）
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_max_chapters() -> u32 {
    20
}

fn default_chapter_delay() -> u64 {
    2000
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for ChaptersConfig {
    fn default() -> Self {
        Self {
            max_chapters: default_max_chapters(),
            delay_ms: default_chapter_delay(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 章节音频输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 输出文件扩展名，与 TTS 后端编码一致
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/chapters")
}

fn default_extension() -> String {
    "mp3".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extension: default_extension(),
        }
    }
}

/// 音色会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// 空闲多久后回收（秒）
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// 回收扫描间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
