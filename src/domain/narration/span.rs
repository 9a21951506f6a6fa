//! Narration Context - Spans

use serde::{Deserialize, Serialize};

use super::{EmotionTag, Prosody, SpanRole, SpeakerId};

/// 分段器输出的原始片段（只有类型和文本）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// 文档内的全局序号，下游唯一的排序键
    pub index: usize,
    /// 所属段落序号
    pub paragraph: usize,
    pub role: SpanRole,
    pub text: String,
}

impl TextSpan {
    pub fn is_dialogue(&self) -> bool {
        self.role == SpanRole::Dialogue
    }
}

/// 完成归属的片段
///
/// 不变量:
/// - 创建后不可修改
/// - 旁白片段没有说话人
/// - `index` 决定最终音频中的位置，与合成完成顺序无关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    index: usize,
    paragraph: usize,
    role: SpanRole,
    text: String,
    speaker: Option<SpeakerId>,
    emotion: EmotionTag,
    prosody: Prosody,
}

impl Span {
    /// 由原始片段构造，韵律由情感决定
    pub fn attributed(raw: TextSpan, speaker: Option<SpeakerId>, emotion: EmotionTag) -> Self {
        let speaker = match raw.role {
            SpanRole::Narration => None,
            SpanRole::Dialogue => Some(speaker.unwrap_or_else(SpeakerId::unknown)),
        };
        Self {
            index: raw.index,
            paragraph: raw.paragraph,
            role: raw.role,
            text: raw.text,
            speaker,
            emotion,
            prosody: emotion.prosody(),
        }
    }

    /// 选音色时使用的身份：旁白固定为 `narrator`
    pub fn voice_key(&self) -> SpeakerId {
        self.speaker.clone().unwrap_or_else(SpeakerId::narrator)
    }

    // Getters
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn paragraph(&self) -> usize {
        self.paragraph
    }

    pub fn role(&self) -> SpanRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> Option<&SpeakerId> {
        self.speaker.as_ref()
    }

    pub fn emotion(&self) -> EmotionTag {
        self.emotion
    }

    pub fn prosody(&self) -> Prosody {
        self.prosody
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(role: SpanRole) -> TextSpan {
        TextSpan {
            index: 3,
            paragraph: 1,
            role,
            text: "Run!".to_string(),
        }
    }

    #[test]
    fn test_narration_never_has_speaker() {
        let span = Span::attributed(
            raw(SpanRole::Narration),
            Some(SpeakerId::new("girl")),
            EmotionTag::Neutral,
        );
        assert!(span.speaker().is_none());
        assert!(span.voice_key().is_narrator());
    }

    #[test]
    fn test_dialogue_defaults_to_unknown() {
        let span = Span::attributed(raw(SpanRole::Dialogue), None, EmotionTag::Fearful);
        assert!(span.voice_key().is_unknown());
        assert_eq!(span.prosody(), EmotionTag::Fearful.prosody());
        assert_eq!(span.index(), 3);
    }
}
