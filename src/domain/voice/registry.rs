//! Voice Registry - 说话人到音色的稳定映射
//!
//! 分配规则:
//! - `narrator` 固定使用目录中的旁白音色
//! - `unknown` 每次都从整个音色池均匀抽取，不缓存（不同的未知说话人不视为同一人）
//! - 其他说话人：已分配则复用；否则优先从未被其他说话人占用的音色中抽取，
//!   全部占用后退化为整个池子可重复抽取
//! - 开启性别感知时，能推断出性别就先把候选限制到该性别的音色
//!
//! 不变量：同一个 Registry 生命周期内，同一非保留说话人的音色永不改变。
//! 新说话人的分配在互斥锁内完成，并发调用不会给同一说话人分配两个音色。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{GenderHint, RandomVoicePicker, VoiceCatalog, VoiceId, VoicePicker, VoiceProfile};
use crate::domain::narration::SpeakerId;

/// 音色分配表
pub struct VoiceRegistry {
    catalog: VoiceCatalog,
    picker: Arc<dyn VoicePicker>,
    gender_hint: Option<Arc<dyn GenderHint>>,
    assignments: Mutex<HashMap<SpeakerId, VoiceId>>,
}

impl VoiceRegistry {
    /// 创建使用随机策略、不区分性别的 Registry
    pub fn new(catalog: VoiceCatalog) -> Self {
        Self {
            catalog,
            picker: Arc::new(RandomVoicePicker),
            gender_hint: None,
            assignments: Mutex::new(HashMap::new()),
        }
    }

    /// 替换选音色策略
    pub fn with_picker(mut self, picker: Arc<dyn VoicePicker>) -> Self {
        self.picker = picker;
        self
    }

    /// 开启性别感知
    pub fn with_gender_hint(mut self, hint: Arc<dyn GenderHint>) -> Self {
        self.gender_hint = Some(hint);
        self
    }

    /// 从快照恢复已有分配；保留标识和目录外的音色会被忽略
    pub fn with_assignments(self, snapshot: BTreeMap<SpeakerId, VoiceId>) -> Self {
        {
            let mut assignments = self.lock();
            for (speaker, voice) in snapshot {
                if speaker.is_reserved() || !self.in_pool(&voice) {
                    tracing::warn!(speaker = %speaker, voice = %voice, "Ignoring invalid voice assignment");
                    continue;
                }
                assignments.insert(speaker, voice);
            }
        }
        self
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// 为说话人分配音色（同一 Registry 内幂等，`unknown` 除外）
    pub fn assign(&self, speaker: &SpeakerId) -> VoiceId {
        if speaker.is_narrator() {
            return self.catalog.narrator().clone();
        }

        if speaker.is_unknown() {
            return self.draw(self.catalog.pool());
        }

        let mut assignments = self.lock();
        if let Some(voice) = assignments.get(speaker) {
            return voice.clone();
        }

        let base = self.gendered_pool(speaker);
        let taken: HashSet<&VoiceId> = assignments.values().collect();
        let unused: Vec<VoiceProfile> = base
            .iter()
            .filter(|p| !taken.contains(&p.id))
            .cloned()
            .collect();

        let voice = if unused.is_empty() {
            self.draw(&base)
        } else {
            self.draw(&unused)
        };

        tracing::debug!(speaker = %speaker, voice = %voice, "Voice assigned");
        assignments.insert(speaker.clone(), voice.clone());
        voice
    }

    /// 已分配的音色（不触发分配）
    pub fn assigned(&self, speaker: &SpeakerId) -> Option<VoiceId> {
        self.lock().get(speaker).cloned()
    }

    /// 当前全部分配（可序列化后持久化）
    pub fn snapshot(&self) -> BTreeMap<SpeakerId, VoiceId> {
        self.lock()
            .iter()
            .map(|(s, v)| (s.clone(), v.clone()))
            .collect()
    }

    /// 已分配的说话人数量
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空所有分配
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SpeakerId, VoiceId>> {
        self.assignments.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn in_pool(&self, voice: &VoiceId) -> bool {
        self.catalog.pool().iter().any(|p| &p.id == voice)
    }

    /// 性别感知时的候选池；推断不出性别或该性别无音色时使用整个池子
    fn gendered_pool(&self, speaker: &SpeakerId) -> Vec<VoiceProfile> {
        self.gender_hint
            .as_ref()
            .and_then(|hint| hint.gender_of(speaker))
            .map(|gender| self.catalog.pool_for(gender))
            .filter(|pool| !pool.is_empty())
            .unwrap_or_else(|| self.catalog.pool().to_vec())
    }

    fn draw(&self, candidates: &[VoiceProfile]) -> VoiceId {
        self.picker
            .pick(candidates)
            .or_else(|| self.catalog.pool().first())
            .map(|p| p.id.clone())
            .unwrap_or_else(|| self.catalog.narrator().clone())
    }
}

impl std::fmt::Debug for VoiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceRegistry")
            .field("catalog", &self.catalog)
            .field("assignments", &self.snapshot())
            .finish()
    }
}
