//! Narrio - 多角色有声朗读服务
//!
//! - Domain: narration/, voice/
//! - Application: commands, pipeline, ports
//! - Infrastructure: http, memory, adapters, events

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use narrio::application::ports::{TtsEnginePort, VoiceSessionPort};
use narrio::application::{
    NarrateChapterHandler, NarrateSeriesHandler, RegistryFactory, SynthesisScheduler,
};
use narrio::config::{load_config, print_config, AppConfig, TtsBackend};
use narrio::domain::voice::KeywordGenderHint;
use narrio::infrastructure::adapters::{
    FakeTtsClient, FileChapterStore, HttpChapterSource, HttpChapterSourceConfig, HttpTranslator,
    HttpTranslatorConfig, HttpTtsClient, HttpTtsClientConfig,
};
use narrio::infrastructure::events::EventPublisher;
use narrio::infrastructure::http::{content_type_for, AppState, HttpServer, ServerConfig};
use narrio::infrastructure::memory::{InMemoryVoiceSessions, SessionSweeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Narrio - 多角色有声朗读服务");
    print_config(&config);

    // TTS 引擎
    let tts_engine: Arc<dyn TtsEnginePort> = match config.tts.backend {
        TtsBackend::Http => {
            let tts_config = HttpTtsClientConfig::new(config.tts.url.clone())
                .with_timeout(config.tts.timeout_secs);
            Arc::new(HttpTtsClient::new(tts_config)?)
        }
        TtsBackend::Fake => {
            tracing::warn!("Using fake TTS backend, audio output is synthetic");
            Arc::new(FakeTtsClient::with_defaults())
        }
    };

    // 事件发布器
    let event_publisher = EventPublisher::new().arc();

    // 音色目录
    let mut registries = RegistryFactory::new(config.catalog()?);
    if config.voices.gender_aware {
        registries = registries.with_gender_hint(Arc::new(KeywordGenderHint::default()));
    }

    // 单章朗读
    let scheduler = SynthesisScheduler::new(config.scheduler_config(), tts_engine.clone());
    let mut narrate_handler = NarrateChapterHandler::new(registries.clone(), scheduler)
        .with_events(event_publisher.clone())
        .with_segment_config(config.segment_config())
        .with_attribution(config.attribution_config());

    if config.translation.enabled {
        let translator = HttpTranslator::new(HttpTranslatorConfig {
            base_url: config.translation.url.clone(),
            timeout_secs: config.translation.timeout_secs,
        })?;
        narrate_handler = narrate_handler.with_translator(Arc::new(translator));
    }
    let narrate_handler = Arc::new(narrate_handler);

    // 连续章节朗读
    let chapter_source = HttpChapterSource::new(HttpChapterSourceConfig {
        timeout_secs: config.chapters.timeout_secs,
        ..Default::default()
    })?;
    let chapter_store =
        FileChapterStore::new(&config.storage.output_dir, config.storage.extension.clone()).await?;
    let series_handler = NarrateSeriesHandler::new(
        Arc::new(chapter_source),
        Arc::new(chapter_store),
        narrate_handler.clone(),
        config.series_config(),
    );

    // 音色会话与空闲回收
    let voice_sessions: Arc<dyn VoiceSessionPort> = InMemoryVoiceSessions::new(registries).arc();
    let shutdown = CancellationToken::new();
    let sweeper = SessionSweeper::new(
        voice_sessions.clone(),
        event_publisher.clone(),
        config.session.idle_timeout_secs,
        Duration::from_secs(config.session.sweep_interval_secs),
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown.clone()));

    // HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        tts_engine,
        voice_sessions,
        event_publisher,
        narrate_handler,
        series_handler,
    )
    .with_audio_content_type(content_type_for(&config.storage.extension));

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = sweeper_handle.await {
        tracing::warn!(error = %e, "SessionSweeper task ended abnormally");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志（RUST_LOG 优先于配置）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},narrio={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
