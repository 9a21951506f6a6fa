//! 说话人识别
//!
//! 基于词汇线索的启发式规则，按优先级匹配对白相邻的旁白：
//! 1. 说话动词 + 名字（`said Mira` / `said the old man`），或名字 + 说话动词（`Mira said`）
//! 2. 固定的角色名词表（`old man`、`girl`、`young master` ...）
//! 3. 以上都不匹配时为 `unknown`
//!
//! 这不是自然语言理解，误判为 `unknown` 是可接受的结果。
//!
//! 已知局限：`He said, "I am fine." She frowned.` 中对白优先取后面的旁白
//! `She frowned.`，该句没有说话动词也没有角色名词，结果为 `unknown`，
//! 前一句里的 `He said` 不会被使用。

use regex::Regex;
use std::sync::OnceLock;

use super::{SpeakerId, TextSpan};

/// 说话动词
const REPORTING_VERBS: &[&str] = &[
    "said", "replied", "asked", "yelled", "shouted", "cried", "whispered", "muttered",
    "exclaimed", "answered", "called", "screamed", "roared", "snapped", "murmured", "sighed",
    "added", "continued", "growled", "laughed",
];

/// 角色名词表
const ROLE_NOUNS: &[&str] = &[
    "young master", "young lady", "old man", "old woman", "grandfather", "grandmother",
    "elder", "father", "mother", "uncle", "aunt", "brother", "sister", "master", "lady",
    "girl", "boy", "woman", "man", "child", "stranger", "guard", "king", "queen",
];

/// 代词不算名字
const PRONOUNS: &[&str] = &["he", "she", "they", "i", "we", "you", "it", "him", "her", "them"];

fn role_alternation() -> String {
    let mut nouns: Vec<&str> = ROLE_NOUNS.to_vec();
    // 长词优先，保证 "old man" 先于 "man"
    nouns.sort_by_key(|n| std::cmp::Reverse(n.len()));
    nouns
        .iter()
        .map(|n| n.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

fn verb_alternation() -> String {
    REPORTING_VERBS.join("|")
}

/// 说话动词之后最多两个词
fn verb_then_rest() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"(?i)\b(?:{})\s+(?:(?:the|a|an|his|her|their|my|our)\s+)?(?P<rest>[\w'-]+(?:\s+[\w'-]+)?)",
            verb_alternation()
        );
        Regex::new(&pattern).expect("reporting verb regex")
    })
}

/// 名字 + 说话动词
fn name_then_verb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"\b(?P<name>[A-Z][\w'-]*)\s+(?i:{})\b",
            verb_alternation()
        );
        Regex::new(&pattern).expect("name before verb regex")
    })
}

/// 开头的角色名词
fn leading_role() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"^(?i)(?P<role>{})\b", role_alternation());
        Regex::new(&pattern).expect("leading role regex")
    })
}

/// 开头的专有名字（最多两个首字母大写的词）
fn leading_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<name>[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)?)").expect("leading name regex")
    })
}

/// 任意位置的角色名词
fn any_role() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)\b(?P<role>{})\b", role_alternation());
        Regex::new(&pattern).expect("role noun regex")
    })
}

fn is_pronoun(token: &str) -> bool {
    PRONOUNS.contains(&token.to_lowercase().as_str())
}

/// 规则 1：说话动词 + 名字/角色，或名字 + 说话动词
fn match_reporting_clause(narration: &str) -> Option<SpeakerId> {
    for caps in verb_then_rest().captures_iter(narration) {
        let Some(rest) = caps.name("rest") else {
            continue;
        };
        let rest = rest.as_str();

        if let Some(role) = leading_role().captures(rest).and_then(|c| c.name("role")) {
            return Some(SpeakerId::new(role.as_str()));
        }

        if let Some(name) = leading_name().captures(rest).and_then(|c| c.name("name")) {
            let first = name.as_str().split_whitespace().next().unwrap_or_default();
            if !is_pronoun(first) {
                return Some(SpeakerId::new(name.as_str()));
            }
        }
    }

    name_then_verb()
        .captures_iter(narration)
        .filter_map(|caps| caps.name("name"))
        .map(|m| m.as_str())
        .find(|name| !is_pronoun(name))
        .map(SpeakerId::new)
}

/// 规则 2：最靠前出现的角色名词
fn match_role_noun(narration: &str) -> Option<SpeakerId> {
    any_role()
        .captures(narration)
        .and_then(|c| c.name("role"))
        .map(|m| SpeakerId::new(m.as_str()))
}

/// 根据对白相邻的旁白识别说话人
pub fn resolve_speaker(adjacent_narration: Option<&str>) -> SpeakerId {
    let Some(narration) = adjacent_narration else {
        return SpeakerId::unknown();
    };

    match_reporting_clause(narration)
        .or_else(|| match_role_noun(narration))
        .unwrap_or_else(SpeakerId::unknown)
}

/// 对白相邻的旁白：同段落内紧随其后的旁白优先，否则取紧邻其前的旁白
pub fn adjacent_narration(spans: &[TextSpan], position: usize) -> Option<&str> {
    let current = spans.get(position)?;
    let same_paragraph_narration = |span: &&TextSpan| {
        span.paragraph == current.paragraph && !span.is_dialogue()
    };

    spans
        .get(position + 1)
        .filter(same_paragraph_narration)
        .or_else(|| {
            position
                .checked_sub(1)
                .and_then(|prev| spans.get(prev))
                .filter(same_paragraph_narration)
        })
        .map(|span| span.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::segment_text_default;

    fn resolve(narration: &str) -> String {
        resolve_speaker(Some(narration)).as_str().to_string()
    }

    #[test]
    fn test_verb_then_name() {
        assert_eq!(resolve("replied Mira, without looking up."), "mira");
        assert_eq!(resolve("said Lord Varys."), "lord varys");
        assert_eq!(resolve("said softly, then shouted Mira."), "mira");
    }

    #[test]
    fn test_character_named_narrator_is_not_the_narrator() {
        let speaker = resolve_speaker(Some("said Narrator, grinning."));
        assert!(speaker.is_unknown());
        assert!(!speaker.is_narrator());
    }

    #[test]
    fn test_name_then_verb() {
        assert_eq!(resolve("Then John said quietly."), "john");
    }

    #[test]
    fn test_verb_then_role_noun() {
        assert_eq!(resolve("said the Old Man, stroking his beard."), "old man");
        assert_eq!(resolve("asked his father."), "father");
    }

    #[test]
    fn test_pronouns_are_not_names() {
        assert_eq!(resolve("he said."), "unknown");
        assert_eq!(resolve("said He."), "unknown");
    }

    #[test]
    fn test_role_noun_fallback() {
        assert_eq!(resolve("The young master raised an eyebrow."), "young master");
        assert_eq!(resolve("A girl in red stepped forward."), "girl");
    }

    #[test]
    fn test_role_nouns_respect_word_boundaries() {
        // "woman" 不能被识别为 "man"
        assert_eq!(resolve("The woman laughed softly."), "woman");
        assert_eq!(resolve("Many things happened."), "unknown");
    }

    #[test]
    fn test_no_narration_is_unknown() {
        assert!(resolve_speaker(None).is_unknown());
        assert_eq!(resolve("The wind howled."), "unknown");
    }

    #[test]
    fn test_adjacent_prefers_following_narration() {
        let spans = segment_text_default(r#"He said, "I am fine." She frowned."#);

        assert_eq!(adjacent_narration(&spans, 1), Some("She frowned."));
        // 已知局限：不会取到前一句的 "He"，也不会取到 "She"
        assert!(resolve_speaker(adjacent_narration(&spans, 1)).is_unknown());
    }

    #[test]
    fn test_adjacent_falls_back_to_preceding_narration() {
        let spans = segment_text_default(r#"The old man coughed. "Come closer.""#);

        assert_eq!(adjacent_narration(&spans, 1), Some("The old man coughed."));
        assert_eq!(resolve_speaker(adjacent_narration(&spans, 1)).as_str(), "old man");
    }

    #[test]
    fn test_adjacent_stays_within_paragraph() {
        let spans = segment_text_default("\"Hello?\"\nsaid the girl.");

        assert_eq!(adjacent_narration(&spans, 0), None);
    }

    #[test]
    fn test_adjacent_skips_dialogue_neighbours() {
        let spans = segment_text_default(r#""One." "Two.""#);

        assert_eq!(spans.len(), 2);
        assert_eq!(adjacent_narration(&spans, 0), None);
    }
}
