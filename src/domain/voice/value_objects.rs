//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::VoiceError;

/// 音色标识（合成后端的音色名，如 `en-US-GuyNeural`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色性别标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// 可分配的音色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub id: VoiceId,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl VoiceProfile {
    pub fn new(id: impl Into<String>, gender: Option<Gender>) -> Self {
        Self {
            id: VoiceId::new(id),
            gender,
        }
    }
}

/// 音色目录
///
/// 不变量:
/// - 可分配音色池非空，且 id 不重复
/// - 旁白音色固定，且不在可分配池中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCatalog {
    narrator: VoiceId,
    pool: Vec<VoiceProfile>,
}

impl VoiceCatalog {
    pub fn new(narrator: VoiceId, pool: Vec<VoiceProfile>) -> Result<Self, VoiceError> {
        if narrator.as_str().trim().is_empty() {
            return Err(VoiceError::InvalidCatalog("旁白音色不能为空".to_string()));
        }
        if pool.is_empty() {
            return Err(VoiceError::InvalidCatalog("可分配音色池不能为空".to_string()));
        }

        let mut seen = HashSet::new();
        for profile in &pool {
            if profile.id.as_str().trim().is_empty() {
                return Err(VoiceError::InvalidCatalog("音色 id 不能为空".to_string()));
            }
            if profile.id == narrator {
                return Err(VoiceError::NarratorInPool(narrator.clone()));
            }
            if !seen.insert(profile.id.clone()) {
                return Err(VoiceError::DuplicateVoice(profile.id.clone()));
            }
        }

        Ok(Self { narrator, pool })
    }

    pub fn narrator(&self) -> &VoiceId {
        &self.narrator
    }

    pub fn pool(&self) -> &[VoiceProfile] {
        &self.pool
    }

    /// 指定性别的音色子集
    pub fn pool_for(&self, gender: Gender) -> Vec<VoiceProfile> {
        self.pool
            .iter()
            .filter(|p| p.gender == Some(gender))
            .cloned()
            .collect()
    }
}
