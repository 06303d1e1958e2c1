//! 分句与分词
//!
//! 分词规则：字母数字串（允许内部的 `'` `-` `.` 连接，如 "co-founder"、"3.14"），
//! 省略号算一个 token，其他每个标点单独成为一个 token。
//! 英文附着词单独拆出："Earth's" → `Earth` `'s`，"don't" → `do` `n't`。

use regex::Regex;
use std::sync::LazyLock;

static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:['\-.]\w+)*|\.\.\.|[^\w\s]").expect("分词正则无效")
});

/// 句末标点（可跟右引号 / 右括号），其后必须是空白或文本结束
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?]+["')\]]*(\s+|$)"#).expect("分句正则无效"));

/// 句点后不断句的常见缩写（小写，不含句点）
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "fig", "vol",
    "approx", "dept", "est",
];

/// 以撇号开头的附着词（小写）
const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

/// 分词
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in WORD_PATTERN.find_iter(text) {
        let (stem, clitic) = split_clitic(m.as_str());
        tokens.push(stem.to_string());
        if let Some(clitic) = clitic {
            tokens.push(clitic.to_string());
        }
    }
    tokens
}

/// "Earth's" → ("Earth", Some("'s"))，"can't" → ("ca", Some("n't"))
fn split_clitic(token: &str) -> (&str, Option<&str>) {
    let lowered = token.to_ascii_lowercase();

    if lowered.len() > 3 && lowered.ends_with("n't") {
        let at = token.len() - 3;
        return (&token[..at], Some(&token[at..]));
    }

    if let Some(at) = token.rfind('\'') {
        if at > 0 && CLITICS.contains(&&lowered[at..]) {
            return (&token[..at], Some(&token[at..]));
        }
    }

    (token, None)
}

/// 分句
///
/// 在句末标点后的空白处切分；前一个词是常见缩写时不切分。
/// 返回的句子已去掉首尾空白，且不为空。
pub fn sent_tokenize(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        let candidate = &text[start..m.end()];
        if ends_with_abbreviation(candidate.trim_end()) {
            continue;
        }
        push_sentence(&mut sentences, candidate);
        start = m.end();
    }

    if start < text.len() {
        push_sentence(&mut sentences, &text[start..]);
    }

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// 句子是否以 "缩写." 结尾，例如 "... Dr."
fn ends_with_abbreviation(sentence: &str) -> bool {
    let Some(without_dot) = sentence.strip_suffix('.') else {
        return false;
    };
    let last_word = without_dot
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    ABBREVIATIONS.contains(&last_word.as_str())
}
