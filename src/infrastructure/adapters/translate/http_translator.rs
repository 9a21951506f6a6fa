//! HTTP Translator - LibreTranslate 兼容的翻译服务
//!
//! POST {base_url}/translate
//! Request: {"q": "...", "source": "auto", "target": "fr", "format": "text"}
//! Response: {"translatedText": "..."}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{TranslateError, TranslatorPort};

#[derive(Debug, Serialize)]
struct TranslateHttpRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateHttpResponse {
    translated_text: String,
}

/// HTTP 翻译客户端配置
#[derive(Debug, Clone)]
pub struct HttpTranslatorConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for HttpTranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP 翻译客户端
pub struct HttpTranslator {
    client: Client,
    config: HttpTranslatorConfig,
}

impl HttpTranslator {
    pub fn new(config: HttpTranslatorConfig) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn translate_url(&self) -> String {
        format!("{}/translate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TranslatorPort for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let body = TranslateHttpRequest {
            q: text,
            source: "auto",
            target: target_lang,
            format: "text",
        };

        tracing::debug!(
            url = %self.translate_url(),
            chars = text.chars().count(),
            target = %target_lang,
            "Sending translate request"
        );

        let response = self
            .client
            .post(self.translate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout
                } else {
                    TranslateError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslateError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: TranslateHttpResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;

        Ok(parsed.translated_text)
    }
}
