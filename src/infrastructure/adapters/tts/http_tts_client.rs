//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/synthesize
//! Request: {"text": "...", "voice": "...", "rate": "+0%", "pitch": "+0%", "volume": "+0%"}
//!      or: {"ssml": "<speak>...</speak>", "voice": "..."}
//! Response: 音频二进制（后端原生编码），Content-Type 标明格式

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{InferRequest, InferResponse, TtsEnginePort, TtsError};

/// TTS 合成请求体 (JSON)
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TtsHttpRequest {
    Plain {
        text: String,
        voice: String,
        rate: String,
        pitch: String,
        volume: String,
    },
    Ssml {
        ssml: String,
        voice: String,
    },
}

impl From<InferRequest> for TtsHttpRequest {
    fn from(request: InferRequest) -> Self {
        let voice = request.voice_id.as_str().to_string();
        match request.ssml {
            Some(ssml) => Self::Ssml { ssml, voice },
            None => Self::Plain {
                text: request.text,
                voice,
                rate: request.prosody.rate(),
                pitch: request.prosody.pitch(),
                volume: request.prosody.volume(),
            },
        }
    }
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5050".to_string(),
            timeout_secs: 60,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/api/tts/synthesize", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        let voice = request.voice_id.clone();
        let text_len = request.text.len();
        let http_request = TtsHttpRequest::from(request);

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = text_len,
            voice = %voice,
            ssml = matches!(http_request, TtsHttpRequest::Ssml { .. }),
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .json(&http_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TtsError::VoiceNotFound(voice.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else {
                    TtsError::InvalidResponse(format!("Failed to read audio: {}", e))
                }
            })?
            .to_vec();

        tracing::debug!(
            voice = %voice,
            content_type = ?content_type,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(InferResponse {
            audio_data,
            content_type,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
