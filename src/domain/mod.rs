//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Narration Context: 章节分段、说话人识别、情感韵律
//! - Voice Context: 音色目录与说话人音色分配

pub mod narration;
pub mod voice;
