//! Fake TTS Client - 用于测试和本地联调的 TTS 客户端
//!
//! 不调用任何服务，按请求内容生成确定性的字节，便于校验拼接顺序

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{InferRequest, InferResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 模拟推理延迟
    pub latency: Duration,
    /// 输出补齐到的最小字节数
    pub pad_to: usize,
    /// 文本包含这些片段时返回服务错误
    pub fail_on: Vec<String>,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(0),
            pad_to: 256,
            fail_on: Vec::new(),
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    calls: AtomicUsize,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency.as_millis() as u64,
            pad_to = config.pad_to,
            "FakeTtsClient initialized"
        );
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    /// 某个请求会得到的音频字节
    pub fn render(&self, request: &InferRequest) -> Vec<u8> {
        let mut audio = format!(
            "<{}|{},{},{}|{}>",
            request.voice_id,
            request.prosody.pitch(),
            request.prosody.rate(),
            request.prosody.volume(),
            request.text
        )
        .into_bytes();
        if audio.len() < self.config.pad_to {
            audio.resize(self.config.pad_to, b'.');
        }
        audio
    }

    /// 已收到的请求数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            "FakeTtsClient: rendering deterministic audio"
        );

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if self
            .config
            .fail_on
            .iter()
            .any(|needle| request.text.contains(needle.as_str()))
        {
            return Err(TtsError::ServiceError("HTTP 500: fake failure".to_string()));
        }

        Ok(InferResponse {
            audio_data: self.render(&request),
            content_type: Some("audio/mpeg".to_string()),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
