//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 重试次数上限
const MAX_RETRIES_LIMIT: u32 = 3;

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `NARRIO_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `NARRIO_SERVER__PORT=8080`
/// - `NARRIO_TTS__URL=http://tts-server:5050`
/// - `NARRIO_TTS__BACKEND=fake`
/// - `NARRIO_SCHEDULER__MAX_CONCURRENT=8`
/// - `NARRIO_TRANSLATION__ENABLED=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级），音色池等复合默认值由 serde 提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("tts.backend", "http")?
        .set_default("tts.url", "http://localhost:5050")?
        .set_default("tts.timeout_secs", 60)?
        .set_default("tts.ssml", false)?
        .set_default("scheduler.max_concurrent", 4)?
        .set_default("scheduler.max_retries", 0)?
        .set_default("scheduler.job_timeout_secs", 90)?
        .set_default("scheduler.min_audio_bytes", 256)?
        .set_default("voices.narrator", "en-US-GuyNeural")?
        .set_default("voices.gender_aware", false)?
        .set_default("narration.classify_narration", false)?
        .set_default("translation.enabled", false)?
        .set_default("translation.url", "")?
        .set_default("translation.timeout_secs", 30)?
        .set_default("chapters.max_chapters", 20)?
        .set_default("chapters.delay_ms", 2000)?
        .set_default("chapters.timeout_secs", 10)?
        .set_default("storage.output_dir", "data/chapters")?
        .set_default("storage.extension", "mp3")?
        .set_default("session.idle_timeout_secs", 3600)?
        .set_default("session.sweep_interval_secs", 300)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: NARRIO_TTS__URL=http://tts-server:5050
    builder = builder.add_source(
        Environment::with_prefix("NARRIO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.scheduler.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Scheduler max_concurrent must be at least 1".to_string(),
        ));
    }

    if config.scheduler.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "Scheduler max_retries cannot exceed {}",
            MAX_RETRIES_LIMIT
        )));
    }

    if config.scheduler.job_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Scheduler job_timeout_secs cannot be 0".to_string(),
        ));
    }

    // 旁白不在池中、池非空、无重复
    config
        .catalog()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid voice catalog: {}", e)))?;

    if config.translation.enabled && config.translation.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Translation URL cannot be empty when translation is enabled".to_string(),
        ));
    }

    if config.session.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Session sweep interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("TTS Backend: {:?}", config.tts.backend);
    tracing::info!("TTS URL: {}", config.tts.url);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("SSML: {}", config.tts.ssml);
    tracing::info!(
        "Scheduler: max_concurrent={}, max_retries={}, job_timeout={}s, min_audio_bytes={}",
        config.scheduler.max_concurrent,
        config.scheduler.max_retries,
        config.scheduler.job_timeout_secs,
        config.scheduler.min_audio_bytes
    );
    tracing::info!("Narrator Voice: {}", config.voices.narrator);
    tracing::info!("Voice Pool: {} voices", config.voices.pool.len());
    tracing::info!("Gender Aware: {}", config.voices.gender_aware);
    tracing::info!("Translation Enabled: {}", config.translation.enabled);
    if config.translation.enabled {
        tracing::info!("Translation URL: {}", config.translation.url);
    }
    tracing::info!(
        "Series: max_chapters={}, delay={}ms",
        config.chapters.max_chapters,
        config.chapters.delay_ms
    );
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Session Idle Timeout: {}s", config.session.idle_timeout_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
