//! 情感与韵律分类
//!
//! 纯函数：小写化后按词切分，依固定优先级检查每种情感的关键词表，
//! 第一个命中的情感胜出，全部未命中为 `neutral`。

use super::{EmotionTag, Prosody};

/// 情感关键词表（顺序即优先级）
const EMOTION_KEYWORDS: &[(EmotionTag, &[&str])] = &[
    (
        EmotionTag::Angry,
        &[
            "angry", "furious", "rage", "mad", "damn", "hate", "bastard", "idiot", "fool",
            "fury", "enough", "silence", "shut",
        ],
    ),
    (
        EmotionTag::Cheerful,
        &[
            "happy", "glad", "haha", "hehe", "great", "wonderful", "delighted", "joy",
            "excited", "yay", "hooray", "congratulations", "love", "awesome",
        ],
    ),
    (
        EmotionTag::Sad,
        &[
            "sad", "sorry", "tears", "lonely", "miss", "grief", "alas", "mourn", "gone",
            "dead", "died", "unfortunately", "forgive",
        ],
    ),
    (
        EmotionTag::Fearful,
        &[
            "afraid", "scared", "fear", "terrified", "help", "run", "monster", "ghost", "panic",
            "please", "mercy", "danger",
        ],
    ),
    (
        EmotionTag::Serious,
        &[
            "must", "important", "careful", "listen", "warning", "serious", "duty", "order",
            "remember", "swear", "promise",
        ],
    ),
    (
        EmotionTag::Embarrassed,
        &[
            "embarrassed", "embarrassing", "awkward", "shy", "ashamed", "um", "uh", "er",
            "blush", "oops",
        ],
    ),
];

/// 识别文本的情感标签
pub fn classify(text: &str) -> EmotionTag {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    EMOTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| words.iter().any(|w| keywords.contains(w)))
        .map(|(emotion, _)| *emotion)
        .unwrap_or(EmotionTag::Neutral)
}

/// 识别情感并给出对应的韵律参数
pub fn classify_prosody(text: &str) -> (EmotionTag, Prosody) {
    let emotion = classify(text);
    (emotion, emotion.prosody())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert_eq!(classify("I hate you!"), EmotionTag::Angry);
        assert_eq!(classify("Haha, that was wonderful."), EmotionTag::Cheerful);
        assert_eq!(classify("I'm so sorry."), EmotionTag::Sad);
        assert_eq!(classify("Help! Someone help me!"), EmotionTag::Fearful);
        assert_eq!(classify("Listen carefully to me."), EmotionTag::Serious);
        assert_eq!(classify("Um... that is awkward."), EmotionTag::Embarrassed);
    }

    #[test]
    fn test_no_match_is_neutral() {
        let (emotion, prosody) = classify_prosody("The tea is on the table.");
        assert_eq!(emotion, EmotionTag::Neutral);
        assert!(prosody.is_neutral());
    }

    #[test]
    fn test_priority_order() {
        // 同时命中 angry 与 sad，angry 优先
        assert_eq!(classify("I'm sorry, but I hate this."), EmotionTag::Angry);
        // 同时命中 cheerful 与 fearful，cheerful 优先
        assert_eq!(classify("Run! Haha!"), EmotionTag::Cheerful);
    }

    #[test]
    fn test_case_insensitive_whole_words() {
        assert_eq!(classify("FURIOUS"), EmotionTag::Angry);
        // "made" 不应命中 "mad"
        assert_eq!(classify("She made tea."), EmotionTag::Neutral);
    }

    #[test]
    fn test_classification_is_pure() {
        let text = "Please, I'm scared of the dark.";
        let first = classify_prosody(text);
        for _ in 0..10 {
            assert_eq!(classify_prosody(text), first);
        }
        assert_eq!(first.0, EmotionTag::Fearful);
    }
}
