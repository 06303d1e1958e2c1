//! 文本清洗 - 业务能力层
//!
//! 纯函数，确定性，无副作用；`clean(clean(x)) == clean(x)`

use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// 以 http 开头的一串非空白字符
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("URL 正则无效"));

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\t]+").expect("换行正则无效"));

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("空白正则无效"));

/// 清洗文本
///
/// 步骤：
/// 1. NFKD 规范化后丢弃所有非 ASCII 字符（é → e，无对应字符的直接丢弃）
/// 2. 删除 URL；紧跟在 URL 末尾的一个标点保留（"Visit http://x.com." → "Visit ."）
/// 3. 连续的换行 / 制表符替换为一个空格
/// 4. 两个以上的连续空白压缩为一个空格
/// 5. 去掉首尾空白
pub fn clean(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();

    let without_urls = URL_PATTERN.replace_all(&ascii, |caps: &Captures| {
        let matched = &caps[0];
        match matched.chars().last() {
            Some(last) if last.is_ascii_punctuation() => last.to_string(),
            _ => String::new(),
        }
    });

    let single_lines = LINE_BREAKS.replace_all(&without_urls, " ");
    let collapsed = MULTI_SPACE.replace_all(&single_lines, " ");

    let cleaned = collapsed.trim().to_string();
    tracing::debug!("文本清洗完成，最终长度: {} 字符", cleaned.len());
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_removal_keeps_trailing_period() {
        assert_eq!(
            clean(" This is a test.\n\nVisit http://x.com. "),
            "This is a test. Visit ."
        );
    }

    #[test]
    fn test_whitespace_and_tabs_collapse() {
        let raw = "  This is a   test.\n\nIt has extra    spaces and\ttabs. Visit http://example.com.  ";
        assert_eq!(
            clean(raw),
            "This is a test. It has extra spaces and tabs. Visit ."
        );
    }

    #[test]
    fn test_transliterates_and_drops_non_ascii() {
        assert_eq!(clean("café naïve"), "cafe naive");
        assert_eq!(clean("π ≈ 3.14 😀 done"), "3.14 done");
    }

    #[test]
    fn test_url_without_trailing_punctuation() {
        assert_eq!(clean("see https://a.b/c?d=1 now"), "see now");
        assert_eq!(clean("(https://a.b/c)"), "()");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            " This is a test.\n\nVisit http://x.com. ",
            "a\r\t\nb  c\u{00a0}\u{00a0}d",
            "Ünïcödé\ttext http://x.y.z!! and https://q.",
            "http.",
            "\t\t leading tabs and trailing newline\n",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean(""), "");
    }
}
