//! 片段归属：为对白识别说话人，为片段分配情感

use super::prosody::classify;
use super::speaker::{adjacent_narration, resolve_speaker};
use super::{EmotionTag, Span, SpanRole, TextSpan};

/// 归属配置
#[derive(Debug, Clone, Default)]
pub struct AttributionConfig {
    /// 旁白是否也做情感识别（默认旁白保持中性）
    pub classify_narration: bool,
}

/// 对分段结果做说话人与情感归属
pub fn attribute_spans(raw: Vec<TextSpan>, config: &AttributionConfig) -> Vec<Span> {
    let speakers: Vec<_> = raw
        .iter()
        .enumerate()
        .map(|(position, span)| {
            span.is_dialogue()
                .then(|| resolve_speaker(adjacent_narration(&raw, position)))
        })
        .collect();

    raw.into_iter()
        .zip(speakers)
        .map(|(span, speaker)| {
            let emotion = match span.role {
                SpanRole::Dialogue => classify(&span.text),
                SpanRole::Narration if config.classify_narration => classify(&span.text),
                SpanRole::Narration => EmotionTag::Neutral,
            };
            Span::attributed(span, speaker, emotion)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::segment_text_default;

    #[test]
    fn test_dialogue_gets_speaker_and_emotion() {
        let raw = segment_text_default(r#""Help me!" cried the girl."#);
        let spans = attribute_spans(raw, &AttributionConfig::default());

        assert_eq!(spans[0].speaker().map(|s| s.as_str()), Some("girl"));
        assert_eq!(spans[0].emotion(), EmotionTag::Fearful);
        assert!(spans[1].speaker().is_none());
        assert_eq!(spans[1].emotion(), EmotionTag::Neutral);
    }

    #[test]
    fn test_narration_classification_is_opt_in() {
        let raw = segment_text_default("The monster roared and everyone was afraid.");
        let config = AttributionConfig {
            classify_narration: true,
        };

        let neutral = attribute_spans(raw.clone(), &AttributionConfig::default());
        let classified = attribute_spans(raw, &config);

        assert_eq!(neutral[0].emotion(), EmotionTag::Neutral);
        assert_eq!(classified[0].emotion(), EmotionTag::Fearful);
    }
}
