//! 章节分段器
//!
//! 把章节文本切成有序的旁白/对白片段：
//! 1. 按行切分段落（支持 \n 和 \r\n），丢弃空段落
//! 2. 段落内定位引号对白，引号外的文本按出现顺序成为旁白
//! 3. 可选：过长的旁白按句末标点拆分
//!
//! 不合法的引号永远不会报错，只会退化为旁白。

use super::{SpanRole, TextSpan};

/// 分段配置
#[derive(Debug, Clone, Default)]
pub struct SegmentConfig {
    /// 旁白片段的最大字符数，`None` 表示不拆分
    pub max_span_chars: Option<usize>,
}

/// 检查是否为强分隔符（句末标点）
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '。' | '？' | '！' | '.' | '?' | '!')
}

/// 检查片段是否只包含引号或空白
#[inline]
fn is_trivial_segment(s: &str) -> bool {
    s.chars().all(|c| {
        matches!(c, '"' | '\u{201C}' | '\u{201D}' | '\'' | '\u{2018}' | '\u{2019}') || c.is_whitespace()
    })
}

/// 开引号对应的闭引号：直引号配直引号，弯引号 “ 配 ”
#[inline]
fn closing_mark_for(ch: char) -> Option<char> {
    match ch {
        '"' => Some('"'),
        '\u{201C}' => Some('\u{201D}'),
        _ => None,
    }
}

/// 查找合法的闭引号：其后必须是空白或段落结尾
fn find_closing(paragraph: &str, from: usize, closing: char) -> Option<usize> {
    paragraph[from..]
        .char_indices()
        .filter(|&(_, c)| c == closing)
        .map(|(i, _)| from + i)
        .find(|&at| {
            paragraph[at + closing.len_utf8()..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace)
        })
}

/// 把单个段落拆成 (类型, 文本) 序列，文本已去首尾空白，空片段已丢弃
fn split_paragraph(paragraph: &str) -> Vec<(SpanRole, &str)> {
    let mut pieces: Vec<(SpanRole, &str)> = Vec::new();
    let mut cursor = 0;

    loop {
        let open = paragraph[cursor..]
            .char_indices()
            .find_map(|(i, c)| closing_mark_for(c).map(|close| (cursor + i, c, close)));

        let Some((open_at, open_mark, close_mark)) = open else {
            break;
        };

        let body_start = open_at + open_mark.len_utf8();
        match find_closing(paragraph, body_start, close_mark) {
            Some(close_at) => {
                push_piece(&mut pieces, SpanRole::Narration, &paragraph[cursor..open_at]);
                let body = &paragraph[body_start..close_at];
                if is_trivial_segment(body) {
                    tracing::debug!(offset = open_at, "Dropping empty quotation");
                } else {
                    push_piece(&mut pieces, SpanRole::Dialogue, body);
                }
                cursor = close_at + close_mark.len_utf8();
            }
            None => {
                tracing::debug!(offset = open_at, "Unterminated quotation, treating rest as narration");
                break;
            }
        }
    }

    push_piece(&mut pieces, SpanRole::Narration, &paragraph[cursor..]);
    pieces
}

fn push_piece<'a>(pieces: &mut Vec<(SpanRole, &'a str)>, role: SpanRole, text: &'a str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    pieces.push((role, trimmed));
}

/// 按句末标点切句（不做合并）
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if is_strong_delimiter(ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// 把句子贪心装箱，每箱不超过 max_chars；单句超长时独占一箱
fn pack_sentences(sentences: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for sentence in sentences {
        if buffer.is_empty() {
            buffer = sentence;
            continue;
        }
        let joined_len = buffer.chars().count() + 1 + sentence.chars().count();
        if joined_len <= max_chars {
            buffer.push(' ');
            buffer.push_str(&sentence);
        } else {
            result.push(std::mem::replace(&mut buffer, sentence));
        }
    }

    if !buffer.is_empty() {
        result.push(buffer);
    }

    result
}

/// 对章节文本进行分段
///
/// 返回的片段按出现顺序编号，`index` 从 0 连续递增。
pub fn segment_text(text: &str, config: &SegmentConfig) -> Vec<TextSpan> {
    let mut spans: Vec<TextSpan> = Vec::new();

    let paragraphs = text.lines().map(str::trim).filter(|s| !s.is_empty());

    for (paragraph_index, paragraph) in paragraphs.enumerate() {
        for (role, piece) in split_paragraph(paragraph) {
            let texts = match (role, config.max_span_chars) {
                (SpanRole::Narration, Some(max)) if piece.chars().count() > max => {
                    pack_sentences(split_sentences(piece), max)
                }
                _ => vec![piece.to_string()],
            };

            for text in texts {
                spans.push(TextSpan {
                    index: spans.len(),
                    paragraph: paragraph_index,
                    role,
                    text,
                });
            }
        }
    }

    spans
}

/// 使用默认配置分段（便捷方法）
pub fn segment_text_default(text: &str) -> Vec<TextSpan> {
    segment_text(text, &SegmentConfig::default())
}
