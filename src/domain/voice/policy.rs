//! Voice Context - 分配策略
//!
//! 随机选音色与性别推断都做成可替换的策略对象，测试中可换成确定性实现。

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::sync::Mutex;

use super::{Gender, VoiceProfile};
use crate::domain::narration::SpeakerId;

/// 从候选音色中挑选一个
pub trait VoicePicker: Send + Sync {
    /// 候选为空时返回 None
    fn pick<'a>(&self, candidates: &'a [VoiceProfile]) -> Option<&'a VoiceProfile>;
}

/// 均匀随机（线程本地 RNG）
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomVoicePicker;

impl VoicePicker for RandomVoicePicker {
    fn pick<'a>(&self, candidates: &'a [VoiceProfile]) -> Option<&'a VoiceProfile> {
        candidates.choose(&mut rand::rng())
    }
}

/// 固定种子的均匀随机，结果可复现
pub struct SeededVoicePicker {
    rng: Mutex<StdRng>,
}

impl SeededVoicePicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl VoicePicker for SeededVoicePicker {
    fn pick<'a>(&self, candidates: &'a [VoiceProfile]) -> Option<&'a VoiceProfile> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        candidates.choose(&mut *rng)
    }
}

/// 总是取第一个候选
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstVoicePicker;

impl VoicePicker for FirstVoicePicker {
    fn pick<'a>(&self, candidates: &'a [VoiceProfile]) -> Option<&'a VoiceProfile> {
        candidates.first()
    }
}

/// 从说话人标识推断性别
pub trait GenderHint: Send + Sync {
    fn gender_of(&self, speaker: &SpeakerId) -> Option<Gender>;
}

const MALE_WORDS: &[&str] = &[
    "man", "boy", "father", "grandfather", "uncle", "brother", "master", "king", "lord", "sir",
    "mr", "son", "husband", "elder", "prince",
];

const FEMALE_WORDS: &[&str] = &[
    "woman", "girl", "mother", "grandmother", "aunt", "sister", "lady", "queen", "miss", "mrs",
    "ms", "daughter", "wife", "princess",
];

/// 基于词表的性别推断：标识中任意一个词命中即可
#[derive(Debug, Clone)]
pub struct KeywordGenderHint {
    male: Vec<String>,
    female: Vec<String>,
}

impl KeywordGenderHint {
    pub fn new(male: Vec<String>, female: Vec<String>) -> Self {
        Self { male, female }
    }
}

impl Default for KeywordGenderHint {
    fn default() -> Self {
        Self::new(
            MALE_WORDS.iter().map(|w| w.to_string()).collect(),
            FEMALE_WORDS.iter().map(|w| w.to_string()).collect(),
        )
    }
}

impl GenderHint for KeywordGenderHint {
    fn gender_of(&self, speaker: &SpeakerId) -> Option<Gender> {
        let words: Vec<&str> = speaker
            .as_str()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let hit = |list: &[String]| words.iter().any(|w| list.iter().any(|k| k == w));

        match (hit(&self.male), hit(&self.female)) {
            (true, false) => Some(Gender::Male),
            (false, true) => Some(Gender::Female),
            _ => None,
        }
    }
}
