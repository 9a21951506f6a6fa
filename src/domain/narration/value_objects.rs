//! Narration Context - Value Objects

use serde::{Deserialize, Serialize};

/// 片段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanRole {
    /// 旁白
    Narration,
    /// 引号内的对白
    Dialogue,
}

impl SpanRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanRole::Narration => "narration",
            SpanRole::Dialogue => "dialogue",
        }
    }
}

/// 说话人标识
///
/// 不变量:
/// - 内容已规范化（去首尾空白、小写、内部空白折叠为单个空格）
/// - 空内容一律视为 `unknown`
/// - `new` 永远不会得到 `narrator`：恰好叫 "Narrator" 的角色也按 `unknown` 处理，
///   旁白标识只能由 `narrator()` 构造
///
/// 两个说话人相同当且仅当规范化后的字节完全相等，不做同义词消解。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerId(String);

impl SpeakerId {
    /// 旁白保留标识
    pub const NARRATOR: &'static str = "narrator";
    /// 无法识别说话人时的保留标识
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw
            .as_ref()
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        if normalized.is_empty() || normalized == Self::NARRATOR {
            return Self::unknown();
        }
        Self(normalized)
    }

    pub fn narrator() -> Self {
        Self(Self::NARRATOR.to_string())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn is_narrator(&self) -> bool {
        self.0 == Self::NARRATOR
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// `narrator` 与 `unknown` 不参与持久分配
    pub fn is_reserved(&self) -> bool {
        self.is_narrator() || self.is_unknown()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 情感标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionTag {
    Angry,
    Cheerful,
    Sad,
    Fearful,
    Serious,
    Embarrassed,
    Neutral,
}

impl EmotionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionTag::Angry => "angry",
            EmotionTag::Cheerful => "cheerful",
            EmotionTag::Sad => "sad",
            EmotionTag::Fearful => "fearful",
            EmotionTag::Serious => "serious",
            EmotionTag::Embarrassed => "embarrassed",
            EmotionTag::Neutral => "neutral",
        }
    }

    /// 每种情感对应固定的韵律调整
    pub fn prosody(&self) -> Prosody {
        match self {
            EmotionTag::Angry => Prosody::new(8, 12, 20),
            EmotionTag::Cheerful => Prosody::new(10, 8, 5),
            EmotionTag::Sad => Prosody::new(-8, -15, -10),
            EmotionTag::Fearful => Prosody::new(6, 15, -5),
            EmotionTag::Serious => Prosody::new(-5, -5, 5),
            EmotionTag::Embarrassed => Prosody::new(4, -8, -15),
            EmotionTag::Neutral => Prosody::NEUTRAL,
        }
    }
}

impl std::fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 韵律参数（百分比增量）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prosody {
    /// 音调增量 (%)
    pub pitch_pct: i16,
    /// 语速增量 (%)
    pub rate_pct: i16,
    /// 音量增量 (%)
    pub volume_pct: i16,
}

impl Prosody {
    pub const NEUTRAL: Prosody = Prosody {
        pitch_pct: 0,
        rate_pct: 0,
        volume_pct: 0,
    };

    pub const fn new(pitch_pct: i16, rate_pct: i16, volume_pct: i16) -> Self {
        Self {
            pitch_pct,
            rate_pct,
            volume_pct,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// 形如 `+10%` / `-5%` / `+0%`
    pub fn pitch(&self) -> String {
        format_delta(self.pitch_pct)
    }

    pub fn rate(&self) -> String {
        format_delta(self.rate_pct)
    }

    pub fn volume(&self) -> String {
        format_delta(self.volume_pct)
    }
}

fn format_delta(pct: i16) -> String {
    format!("{:+}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_id_normalization() {
        assert_eq!(SpeakerId::new("  Old   Man ").as_str(), "old man");
        assert_eq!(SpeakerId::new("Lin Feng"), SpeakerId::new("lin  feng"));
        assert!(SpeakerId::new("   ").is_unknown());
    }

    #[test]
    fn test_reserved_speakers() {
        assert!(SpeakerId::narrator().is_reserved());
        assert!(SpeakerId::new("UNKNOWN").is_reserved());
        assert!(!SpeakerId::new("girl").is_reserved());
    }

    #[test]
    fn test_new_never_yields_narrator() {
        let named = SpeakerId::new("  Narrator ");
        assert!(named.is_unknown());
        assert!(!named.is_narrator());
        assert!(SpeakerId::narrator().is_narrator());
    }

    #[test]
    fn test_prosody_formatting() {
        let prosody = Prosody::new(10, -5, 0);
        assert_eq!(prosody.pitch(), "+10%");
        assert_eq!(prosody.rate(), "-5%");
        assert_eq!(prosody.volume(), "+0%");
    }

    #[test]
    fn test_neutral_prosody_is_zero() {
        assert!(EmotionTag::Neutral.prosody().is_neutral());
        assert!(!EmotionTag::Angry.prosody().is_neutral());
    }
}
