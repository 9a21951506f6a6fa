//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色目录（旁白音色 + 可分配音色池）
//! - 说话人到音色的分配与延续
//! - 可替换的随机/性别策略

mod errors;
mod policy;
mod registry;
mod value_objects;

pub use errors::VoiceError;
pub use policy::{
    FirstVoicePicker, GenderHint, KeywordGenderHint, RandomVoicePicker, SeededVoicePicker,
    VoicePicker,
};
pub use registry::VoiceRegistry;
pub use value_objects::{Gender, VoiceCatalog, VoiceId, VoiceProfile};
