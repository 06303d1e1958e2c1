//! 题目编排器 - 编排层
//!
//! ## 职责
//!
//! 按配额为一组文本块生成题目：
//!
//! ```text
//! for 题型 in [mcq, true_false, short_answer, long_answer, hots]:
//!     for i in 0..配额[题型]:
//!         上下文 = 有效块[i % 有效块数]      ← 每个题型都从 0 号块重新开始
//!         QuestionFlow::run(上下文)
//! ```
//!
//! - 有效块：去掉首尾空白后长度 > 10 个字符
//! - 校验未通过的候选题目直接丢弃
//! - 单次生成出错只跳过这一次，不影响其余题目和其他题型

use rand::RngCore;
use tracing::{error, info, warn};

use crate::models::{GenerationConfig, GenerationResult, QuestionType};
use crate::services::QuestionSource;
use crate::workflow::{ProcessResult, QuestionCtx, QuestionFlow};

const MIN_CHUNK_CHARS: usize = 10;

/// 单次编排的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// 题目编排器
pub struct Orchestrator<S> {
    flow: QuestionFlow<S>,
}

impl<S: QuestionSource> Orchestrator<S> {
    pub fn new(source: S) -> Self {
        Self {
            flow: QuestionFlow::new(source),
        }
    }

    pub fn with_verbose_logging(self, verbose_logging: bool) -> Self {
        Self {
            flow: self.flow.with_verbose_logging(verbose_logging),
        }
    }

    pub fn source(&self) -> &S {
        self.flow.source()
    }

    /// 按配额生成题目
    pub async fn generate_questions<C, R>(
        &self,
        chunks: &[C],
        config: &GenerationConfig,
        rng: &mut R,
    ) -> GenerationResult
    where
        C: AsRef<str>,
        R: RngCore + Send,
    {
        self.generate_with_stats(chunks, config, rng).await.0
    }

    /// 按配额生成题目，同时返回统计
    pub async fn generate_with_stats<C, R>(
        &self,
        chunks: &[C],
        config: &GenerationConfig,
        rng: &mut R,
    ) -> (GenerationResult, GenerationStats)
    where
        C: AsRef<str>,
        R: RngCore + Send,
    {
        let mut result = GenerationResult::new();
        let mut stats = GenerationStats::default();

        if chunks.is_empty() {
            warn!("⚠️ 没有提供文本块，跳过题目生成");
            return (result, stats);
        }

        let valid_chunks: Vec<&str> = chunks
            .iter()
            .map(AsRef::as_ref)
            .filter(|chunk| chunk.trim().chars().count() > MIN_CHUNK_CHARS)
            .collect();

        if valid_chunks.is_empty() {
            warn!("⚠️ 没有有效的文本块（去掉空白后均不超过 {} 个字符）", MIN_CHUNK_CHARS);
            return (result, stats);
        }

        for question_type in QuestionType::ALL {
            let quota = config.quota(question_type) as usize;

            for i in 0..quota {
                let ctx = QuestionCtx::new(
                    question_type,
                    i,
                    quota,
                    valid_chunks.len(),
                    config.difficulty,
                );
                let context = valid_chunks[ctx.chunk_index];

                info!("{} 正在生成...", ctx);

                match self.flow.run(context, &ctx, rng).await {
                    Ok(ProcessResult::Accepted(question, answer)) => {
                        result.push(question, answer);
                        stats.accepted += 1;
                    }
                    Ok(ProcessResult::Rejected) => {
                        warn!("{} ⚠️ 候选题目未通过校验，已丢弃", ctx);
                        stats.rejected += 1;
                    }
                    Err(e) => {
                        error!("{} ❌ 生成失败，跳过: {}", ctx, e);
                        stats.failed += 1;
                    }
                }
            }
        }

        info!(
            "✓ 共生成 {} 道题（请求 {}，丢弃 {}，失败 {}）",
            stats.accepted,
            config.total_requested(),
            stats.rejected,
            stats.failed
        );

        (result, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::services::generation::Candidate;
    use crate::services::QuestionGenerator;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// 记录每次调用拿到的上下文，`fail_on` 中的调用序号返回错误
    struct RecordingSource {
        inner: QuestionGenerator,
        contexts: Mutex<Vec<(QuestionType, String)>>,
        fail_on: Vec<usize>,
    }

    impl RecordingSource {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                inner: QuestionGenerator::rule_based(),
                contexts: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl QuestionSource for RecordingSource {
        async fn generate(
            &self,
            context: &str,
            question_type: QuestionType,
            difficulty: u8,
            rng: &mut (dyn RngCore + Send),
        ) -> Result<Candidate, GenerationError> {
            let call_index = {
                let mut contexts = self.contexts.lock().unwrap();
                contexts.push((question_type, context.to_string()));
                contexts.len() - 1
            };
            if self.fail_on.contains(&call_index) {
                return Err(GenerationError::Failed("simulated failure".to_string()));
            }
            Ok(self
                .inner
                .generate(context, question_type, difficulty, rng)
                .await)
        }
    }

    fn chunks() -> Vec<String> {
        vec![
            "First chunk of meaningful text.".to_string(),
            "   short   ".to_string(),
            "Second chunk with other content.".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_round_robin_restarts_per_type() {
        let orchestrator = Orchestrator::new(RecordingSource::new(vec![]));
        let config = GenerationConfig::default()
            .with_quota(QuestionType::Mcq, 3)
            .with_quota(QuestionType::Hots, 2);
        let mut rng = StdRng::seed_from_u64(0);

        let result = orchestrator
            .generate_questions(&chunks(), &config, &mut rng)
            .await;
        assert_eq!(result.len(), 5);

        let contexts = orchestrator.source().contexts.lock().unwrap().clone();
        let first = "First chunk of meaningful text.".to_string();
        let second = "Second chunk with other content.".to_string();
        assert_eq!(
            contexts,
            vec![
                (QuestionType::Mcq, first.clone()),
                (QuestionType::Mcq, second.clone()),
                (QuestionType::Mcq, first.clone()),
                (QuestionType::Hots, first),
                (QuestionType::Hots, second),
            ]
        );
    }

    #[tokio::test]
    async fn test_type_order_is_fixed() {
        let orchestrator = Orchestrator::new(QuestionGenerator::rule_based());
        let config = GenerationConfig::default()
            .with_quota(QuestionType::Hots, 1)
            .with_quota(QuestionType::ShortAnswer, 1)
            .with_quota(QuestionType::TrueFalse, 1)
            .with_quota(QuestionType::Mcq, 1)
            .with_quota(QuestionType::LongAnswer, 1);
        let mut rng = StdRng::seed_from_u64(0);

        let result = orchestrator
            .generate_questions(&chunks(), &config, &mut rng)
            .await;
        let types: Vec<QuestionType> = result.questions().iter().map(|q| q.question_type).collect();
        assert_eq!(types, QuestionType::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        // 第 0 次和第 3 次调用失败
        let orchestrator = Orchestrator::new(RecordingSource::new(vec![0, 3]));
        let config = GenerationConfig::default()
            .with_quota(QuestionType::Mcq, 2)
            .with_quota(QuestionType::TrueFalse, 2);
        let mut rng = StdRng::seed_from_u64(0);

        let (result, stats) = orchestrator
            .generate_with_stats(&chunks(), &config, &mut rng)
            .await;

        assert_eq!(
            stats,
            GenerationStats {
                accepted: 2,
                rejected: 0,
                failed: 2,
            }
        );
        assert_eq!(result.questions().len(), result.answer_key().len());
        let types: Vec<QuestionType> = result.questions().iter().map(|q| q.question_type).collect();
        assert_eq!(types, vec![QuestionType::Mcq, QuestionType::TrueFalse]);
    }

    #[tokio::test]
    async fn test_only_short_chunks_yields_empty() {
        let orchestrator = Orchestrator::new(QuestionGenerator::rule_based());
        let config = GenerationConfig::default().with_quota(QuestionType::Mcq, 3);
        let mut rng = StdRng::seed_from_u64(0);

        let result = orchestrator
            .generate_questions(&["tiny", "   exactly10c   "], &config, &mut rng)
            .await;
        assert!(result.is_empty());
    }
}
