//! Narration Context - 旁白/对白上下文
//!
//! 职责:
//! - 章节文本分段（旁白 vs 引号对白）
//! - 对白说话人识别
//! - 情感与韵律分类
//!
//! 本上下文全部为纯内存计算，不做任何 I/O。

mod attribution;
mod prosody;
mod segmenter;
mod span;
mod speaker;
mod value_objects;

pub use attribution::{attribute_spans, AttributionConfig};
pub use prosody::{classify, classify_prosody};
pub use segmenter::{segment_text, segment_text_default, SegmentConfig};
pub use span::{Span, TextSpan};
pub use speaker::{adjacent_narration, resolve_speaker};
pub use value_objects::{EmotionTag, Prosody, SpanRole, SpeakerId};
