//! Narrio - 多角色有声朗读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Narration Context: 分段、说话人识别、情感与韵律
//! - Voice Context: 音色目录与说话人音色分配
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, Translator, ChapterSource, ChapterAudioStore, VoiceSessions）
//! - Pipeline: 合成调度与音频拼接
//! - Commands: 单章朗读与连续章节朗读
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 音色会话内存实现
//! - Adapters: TTS Client, Translator, Chapter Source, Chapter Store
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
