//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 生成候选题目（模型 / 规则）
//! 2. 校验（不通过则丢弃，不算错误）
//! 3. 质量评分
//! 4. 组装题目和答案条目

use rand::RngCore;
use tracing::{debug, info};

use crate::error::GenerationError;
use crate::models::{AnswerKeyEntry, GeneratedQuestion, QuestionType};
use crate::services::generation::{score_question, validate_question, Candidate, QuestionSource};
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 题目处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 通过校验
    Accepted(GeneratedQuestion, AnswerKeyEntry),
    /// 未通过校验，已丢弃
    Rejected,
}

/// 题目处理流程
///
/// - 编排"一道题"的处理步骤
/// - 不关心配额和文本块轮转
/// - 只依赖业务能力（`QuestionSource`）
pub struct QuestionFlow<S> {
    source: S,
    verbose_logging: bool,
}

impl<S: QuestionSource> QuestionFlow<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn run(
        &self,
        context: &str,
        ctx: &QuestionCtx,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<ProcessResult, GenerationError> {
        if self.verbose_logging {
            info!("{} 上下文: {}", ctx, truncate_text(context, 80));
        }

        let candidate = self
            .source
            .generate(context, ctx.question_type, ctx.difficulty, rng)
            .await?;

        if !validate_question(&candidate.question)
            || !has_valid_options(ctx.question_type, &candidate)
        {
            debug!("{} 候选题目未通过校验，已丢弃: {}", ctx, candidate.question);
            return Ok(ProcessResult::Rejected);
        }

        let quality_score = score_question(&candidate.question, context);
        debug!(
            "{} ✓ {} (评分 {:.1}, 模式 {})",
            ctx, candidate.question, quality_score, candidate.mode
        );

        let answer = AnswerKeyEntry {
            question: candidate.question.clone(),
            answer: candidate.answer,
        };
        let question = GeneratedQuestion {
            question_type: ctx.question_type,
            question: candidate.question,
            options: candidate.options,
            quality_score,
            difficulty: ctx.difficulty,
            generator_mode: candidate.mode,
        };

        Ok(ProcessResult::Accepted(question, answer))
    }
}

/// 选择题：恰好 4 个选项，正确答案恰好出现一次；其他题型不能带选项
fn has_valid_options(question_type: QuestionType, candidate: &Candidate) -> bool {
    match (question_type, &candidate.options) {
        (QuestionType::Mcq, Some(options)) => {
            options.len() == 4 && options.iter().filter(|o| **o == candidate.answer).count() == 1
        }
        (QuestionType::Mcq, None) => false,
        (_, options) => options.is_none(),
    }
}
