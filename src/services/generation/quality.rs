//! 题目校验与质量评分

use std::collections::HashSet;

use crate::services::tokenizer::word_tokenize;

const MIN_QUESTION_CHARS: usize = 10;

const BLACKLIST: [&str; 4] = ["", "none", "error", "failed"];

/// 疑问 / 分析类词汇（子串匹配）
const QUESTION_WORDS: [&str; 10] = [
    "what", "who", "when", "where", "why", "how", "which", "explain", "describe", "compare",
];

/// 题目是否可以接受
pub fn validate_question(question: &str) -> bool {
    let trimmed = question.trim();

    if trimmed.chars().count() < MIN_QUESTION_CHARS {
        return false;
    }
    if !trimmed.ends_with('?') {
        return false;
    }
    !BLACKLIST.contains(&trimmed.to_lowercase().as_str())
}

/// 质量评分，范围 [0, 1]
///
/// | 条件 | 加分 |
/// |------|------|
/// | 基础分 | 0.5 |
/// | 含疑问 / 分析类词汇 | +0.2 |
/// | 词数 20-100 | +0.2 |
/// | 词数 10-19 或 101-150 | +0.1 |
/// | 与上下文共有 ≥ 2 个词 | +0.1 |
pub fn score_question(question: &str, context: &str) -> f64 {
    // 以 0.1 为单位累加，避免浮点误差
    let mut tenths: u32 = 5;

    let lowered = question.to_lowercase();
    if QUESTION_WORDS.iter().any(|w| lowered.contains(w)) {
        tenths += 2;
    }

    let word_count = word_tokenize(question).len();
    if (20..=100).contains(&word_count) {
        tenths += 2;
    } else if (10..20).contains(&word_count) || (101..=150).contains(&word_count) {
        tenths += 1;
    }

    let question_words: HashSet<String> = word_tokenize(&lowered).into_iter().collect();
    let context_words: HashSet<String> = word_tokenize(&context.to_lowercase())
        .into_iter()
        .collect();
    if question_words.intersection(&context_words).count() >= 2 {
        tenths += 1;
    }

    (f64::from(tenths) / 10.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_question() {
        assert!(validate_question("What is the capital of France?"));
        assert!(validate_question("  Why is the sky blue?  "));

        assert!(!validate_question(""));
        assert!(!validate_question("   "));
        assert!(!validate_question("Short?"));
        assert!(!validate_question("This is a statement without a mark"));
        assert!(!validate_question("Explain in detail the main concepts."));
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 9 个字符，但超过 10 个字节
        assert!(!validate_question("éééééééé?"));
    }

    #[test]
    fn test_score_bounds_and_components() {
        // 疑问词 + 10 个词 + 共有词 ≥ 2
        let score = score_question(
            "What are the key points discussed in this text?",
            "The key points of this text are listed below.",
        );
        assert_eq!(score, 0.9);

        // 无疑问词、词数不足、无共有词
        assert_eq!(score_question("Tell me?", "Unrelated context."), 0.5);
    }

    #[test]
    fn test_score_clamped() {
        let question = format!(
            "What {} relates the planets and the sun?",
            "planets orbit the sun ".repeat(5)
        );
        let score = score_question(&question, "The planets orbit the sun.");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_question_word_is_substring_match() {
        // "somewhat" 中包含 "what"
        let score = score_question("Is it somewhat unclear?", "nothing shared");
        assert_eq!(score, 0.7);
    }
}
