//! 题目处理上下文
//!
//! 封装"我正在生成哪种题型的第几道题、用的是哪个文本块"这一信息

use std::fmt::Display;

use crate::models::QuestionType;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    pub question_type: QuestionType,

    /// 本题型内的序号（从 0 开始）
    pub iteration: usize,

    /// 本题型请求的数量（仅用于日志显示）
    pub quota: usize,

    /// 使用的有效文本块下标
    pub chunk_index: usize,

    /// 难度 1-5
    pub difficulty: u8,
}

impl QuestionCtx {
    /// 按轮转规则选择文本块：第 `iteration` 道题使用 `iteration % valid_chunks` 号块
    pub fn new(
        question_type: QuestionType,
        iteration: usize,
        quota: usize,
        valid_chunks: usize,
        difficulty: u8,
    ) -> Self {
        Self {
            question_type,
            iteration,
            quota,
            chunk_index: iteration % valid_chunks.max(1),
            difficulty,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[题型 {} 第 {}/{} 题 文本块#{}]",
            self.question_type,
            self.iteration + 1,
            self.quota,
            self.chunk_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_chunk_index() {
        let indices: Vec<usize> = (0..5)
            .map(|i| QuestionCtx::new(QuestionType::Mcq, i, 5, 2, 3).chunk_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_display() {
        let ctx = QuestionCtx::new(QuestionType::TrueFalse, 1, 3, 4, 3);
        assert_eq!(ctx.to_string(), "[题型 true_false 第 2/3 题 文本块#1]");
    }
}
