//! 文本分块 - 业务能力层
//!
//! 先分句，再按句子贪心累加 token：
//!
//! ```text
//! 句子:   [s1: 4] [s2: 5] [s3: 12] [s4: 2]      chunk_size = 10
//! 块:     [s1 s2 = 9] [s3 = 12] [s4 = 2]
//! ```
//!
//! - 累加后不超过 `chunk_size` 就并入当前块
//! - 否则先输出当前块，再以这个句子开始新块（即使它自己就超过上限，也不再细分）
//! - 所有块的 token 按顺序拼接，正好等于整段文本分句分词后的 token 序列

use crate::models::Chunk;
use crate::services::tokenizer::{sent_tokenize, word_tokenize};

/// 文本分块器
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// 将清洗后的文本切分为块
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for sentence in sent_tokenize(text) {
            let sentence_tokens = word_tokenize(&sentence);

            if current.len() + sentence_tokens.len() <= self.chunk_size {
                current.extend(sentence_tokens);
            } else {
                if !current.is_empty() {
                    chunks.push(Chunk::from_tokens(std::mem::take(&mut current)));
                }
                current = sentence_tokens;
            }
        }

        if !current.is_empty() {
            chunks.push(Chunk::from_tokens(current));
        }

        tracing::info!(
            "文本切分为 {} 个块，每块约 {} 个 token",
            chunks.len(),
            self.chunk_size
        );
        chunks
    }
}

/// 便捷函数：按 `chunk_size` 切分
pub fn split(text: &str, chunk_size: usize) -> Vec<Chunk> {
    Chunker::new(chunk_size).split(text)
}
