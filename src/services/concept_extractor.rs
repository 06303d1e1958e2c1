//! 关键概念提取 - 业务能力层
//!
//! 基于词频：小写 → 分词 → 去掉停用词、非字母数字 token、长度 ≤ 2 的词 → 计数。
//! 按频率降序返回，频率相同的按首次出现顺序（稳定排序）。

use indexmap::IndexMap;
use phf::phf_set;

use crate::models::Concept;
use crate::services::tokenizer::word_tokenize;

/// 英文停用词
pub static STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just",
    "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y",
    "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't",
    "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
};

pub const DEFAULT_TOP_N: usize = 10;

/// 是否停用词（参数需已小写）
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// 提取关键概念（带频率）
pub fn extract_concepts(text: &str, top_n: usize) -> Vec<Concept> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();

    // IndexMap 保留首次出现顺序
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for word in word_tokenize(&lowered) {
        if is_candidate(&word) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // sort_by 是稳定排序：频率相同的保持首次出现顺序
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let concepts: Vec<Concept> = ranked
        .into_iter()
        .take(top_n)
        .map(|(term, frequency)| Concept { term, frequency })
        .collect();

    tracing::info!("提取了前 {} 个关键概念", concepts.len());
    concepts
}

/// 提取关键概念（只返回词）
pub fn extract_key_concepts(text: &str, top_n: usize) -> Vec<String> {
    extract_concepts(text, top_n)
        .into_iter()
        .map(|c| c.term)
        .collect()
}

fn is_candidate(word: &str) -> bool {
    word.chars().count() > 2 && word.chars().all(char::is_alphanumeric) && !is_stop_word(word)
}
