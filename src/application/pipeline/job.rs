//! Synthesis Jobs & Results

use serde::Serialize;

use crate::application::ports::InferRequest;
use crate::domain::narration::{EmotionTag, Prosody, Span, SpeakerId};
use crate::domain::voice::{VoiceId, VoiceRegistry};

/// 单个片段的合成任务
///
/// `slot` 是结果数组中预留的位置，决定输出顺序，与完成顺序无关
#[derive(Debug, Clone)]
pub struct SynthesisJob {
    pub slot: usize,
    pub span_index: usize,
    pub text: String,
    pub speaker: SpeakerId,
    pub voice: VoiceId,
    pub emotion: EmotionTag,
    pub prosody: Prosody,
}

impl SynthesisJob {
    /// 渲染为 SSML
    pub fn ssml(&self) -> String {
        let voice = escape_xml(self.voice.as_str());
        let text = escape_xml(&self.text);
        format!(
            concat!(
                r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xml:lang="{lang}">"#,
                r#"<voice name="{voice}">"#,
                r#"<prosody pitch="{pitch}" rate="{rate}" volume="{volume}">{text}</prosody>"#,
                r#"</voice></speak>"#
            ),
            lang = locale_of(&self.voice),
            voice = voice,
            pitch = self.prosody.pitch(),
            rate = self.prosody.rate(),
            volume = self.prosody.volume(),
            text = text,
        )
    }

    /// 构造后端请求
    pub fn to_request(&self, use_ssml: bool) -> InferRequest {
        InferRequest {
            text: self.text.clone(),
            voice_id: self.voice.clone(),
            prosody: self.prosody,
            ssml: use_ssml.then(|| self.ssml()),
        }
    }
}

/// 从 `en-US-GuyNeural` 形式的音色名取出语言区域
fn locale_of(voice: &VoiceId) -> String {
    let mut parts = voice.as_str().splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lang), Some(region), Some(_))
            if lang.len() == 2 && region.len() == 2 && region.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            format!("{}-{}", lang, region)
        }
        _ => "en-US".to_string(),
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 片段被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// 后端返回错误
    Backend(String),
    /// 超时
    Timeout,
    /// 音频为空或过小
    UndersizedPayload { len: usize, min: usize },
    /// 运行被取消
    Cancelled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Backend(msg) => write!(f, "backend error: {}", msg),
            SkipReason::Timeout => write!(f, "timed out"),
            SkipReason::UndersizedPayload { len, min } => {
                write!(f, "undersized payload: {} bytes (min {})", len, min)
            }
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 单个任务的结果，永远不会被静默丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisResult {
    Success { audio: Vec<u8> },
    Skipped { reason: SkipReason },
}

impl SynthesisResult {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// 为每个非空片段生成合成任务，音色在此处一次性分配
pub fn build_jobs(spans: &[Span], registry: &VoiceRegistry) -> Vec<SynthesisJob> {
    spans
        .iter()
        .filter(|span| !span.text().trim().is_empty())
        .enumerate()
        .map(|(slot, span)| {
            let speaker = span.voice_key();
            let voice = registry.assign(&speaker);
            SynthesisJob {
                slot,
                span_index: span.index(),
                text: span.text().to_string(),
                speaker,
                voice,
                emotion: span.emotion(),
                prosody: span.prosody(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::{attribute_spans, segment_text_default, AttributionConfig};
    use crate::domain::voice::{FirstVoicePicker, VoiceCatalog, VoiceProfile};
    use std::sync::Arc;

    fn registry() -> VoiceRegistry {
        let catalog = VoiceCatalog::new(
            VoiceId::new("en-US-GuyNeural"),
            vec![
                VoiceProfile::new("en-US-AriaNeural", None),
                VoiceProfile::new("en-GB-RyanNeural", None),
            ],
        )
        .unwrap();
        VoiceRegistry::new(catalog).with_picker(Arc::new(FirstVoicePicker))
    }

    #[test]
    fn test_build_jobs_assigns_voices() {
        let raw = segment_text_default(r#"The hall was quiet. "You fool!" shouted Mira."#);
        let spans = attribute_spans(raw, &AttributionConfig::default());
        let jobs = build_jobs(&spans, &registry());

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].voice.as_str(), "en-US-GuyNeural");
        assert!(jobs[0].speaker.is_narrator());
        assert_eq!(jobs[1].speaker.as_str(), "mira");
        assert_eq!(jobs[1].voice.as_str(), "en-US-AriaNeural");
        assert_eq!(jobs[1].emotion, EmotionTag::Angry);
        assert!(jobs.iter().enumerate().all(|(i, j)| j.slot == i));
    }

    #[test]
    fn test_ssml_rendering() {
        let job = SynthesisJob {
            slot: 0,
            span_index: 0,
            text: "Tom & Jerry <3".to_string(),
            speaker: SpeakerId::new("tom"),
            voice: VoiceId::new("en-GB-RyanNeural"),
            emotion: EmotionTag::Cheerful,
            prosody: EmotionTag::Cheerful.prosody(),
        };

        let ssml = job.ssml();
        assert!(ssml.contains(r#"xml:lang="en-GB""#));
        assert!(ssml.contains(r#"<voice name="en-GB-RyanNeural">"#));
        assert!(ssml.contains(r#"pitch="+10%""#));
        assert!(ssml.contains("Tom &amp; Jerry &lt;3"));
    }

    #[test]
    fn test_request_without_ssml() {
        let job = SynthesisJob {
            slot: 0,
            span_index: 4,
            text: "Hello".to_string(),
            speaker: SpeakerId::narrator(),
            voice: VoiceId::new("custom-voice"),
            emotion: EmotionTag::Neutral,
            prosody: Prosody::NEUTRAL,
        };

        let request = job.to_request(false);
        assert!(request.ssml.is_none());
        assert!(job.ssml().contains(r#"xml:lang="en-US""#));
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::UndersizedPayload { len: 3, min: 256 };
        assert_eq!(reason.to_string(), "undersized payload: 3 bytes (min 256)");
    }
}
