//! Chapter Source Port - 章节获取

use async_trait::async_trait;
use thiserror::Error;

/// 章节获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("No readable content at {0}")]
    EmptyContent(String),
}

/// 获取到的章节
#[derive(Debug, Clone)]
pub struct Chapter {
    pub url: String,
    /// 标题只用于判断章节序列是否结束
    pub title: String,
    pub body: String,
}

/// Chapter Source Port
#[async_trait]
pub trait ChapterSourcePort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Chapter, FetchError>;
}
