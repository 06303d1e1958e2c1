//! 题目生成 - 业务能力层
//!
//! ## 策略
//!
//! | 策略 | 说明 |
//! |------|------|
//! | `ModelStrategy` | 调用模型后端，可能不可用、可能失败或超时 |
//! | `RuleBasedStrategy` | 固定模板，确定性，始终可用 |
//!
//! 策略在构造 `QuestionGenerator` 时确定一次：请求了模型但后端无法初始化时，
//! 直接以规则模式运行。模型模式下单次生成失败，只对这一次改用规则生成，错误不会向上传递。
//!
//! 选择题选项的打乱使用调用方传入的随机源。

pub mod model;
pub mod quality;
pub mod rule_based;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::RngCore;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::infrastructure::{LlmBackend, ModelBackend};
use crate::models::{GeneratorMode, QuestionType};

pub use model::ModelStrategy;
pub use quality::{score_question, validate_question};
pub use rule_based::RuleBasedStrategy;

/// 判断题答案的判定词（子串匹配，不区分大小写）
const FACTUAL_INDICATORS: [&str; 10] = [
    "is", "are", "was", "were", "has", "have", "had", "consists", "contains", "includes",
];

/// 未经校验的候选题目
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub question: String,
    /// 仅选择题有
    pub options: Option<Vec<String>>,
    pub answer: String,
    /// 实际生成这道题的模式（模型失败回退后为 `RuleBased`）
    pub mode: GeneratorMode,
}

impl Candidate {
    /// 没有选项的题目
    pub fn open(question: impl Into<String>, answer: impl Into<String>, mode: GeneratorMode) -> Self {
        Self {
            question: question.into(),
            options: None,
            answer: answer.into(),
            mode,
        }
    }
}

/// 生成器信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorInfo {
    /// 模型名称；规则模式下为 "rule-based"
    pub model_name: String,
    pub mode: GeneratorMode,
    /// 请求了模型模式但后端不可用，已降级为规则模式
    pub fallback_mode: bool,
}

/// 生成策略
pub enum GenerationStrategy {
    Model(ModelStrategy),
    RuleBased(RuleBasedStrategy),
}

/// 单道题的生成能力
///
/// 编排层只依赖这个 trait
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(
        &self,
        context: &str,
        question_type: QuestionType,
        difficulty: u8,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<Candidate, GenerationError>;
}

/// 题目生成器
pub struct QuestionGenerator {
    strategy: GenerationStrategy,
    fallback: RuleBasedStrategy,
    degraded: bool,
}

impl QuestionGenerator {
    /// 根据配置选择策略
    pub fn from_config(config: &Config) -> Self {
        match config.generator_mode {
            GeneratorMode::RuleBased => Self::rule_based(),
            GeneratorMode::Model => match LlmBackend::from_config(config) {
                Ok(backend) => Self::with_backend(
                    Arc::new(backend),
                    Duration::from_secs(config.llm_timeout_secs),
                ),
                Err(e) => {
                    warn!("⚠️ 模型后端初始化失败，使用规则生成: {}", e);
                    Self {
                        strategy: GenerationStrategy::RuleBased(RuleBasedStrategy),
                        fallback: RuleBasedStrategy,
                        degraded: true,
                    }
                }
            },
        }
    }

    /// 规则模式
    pub fn rule_based() -> Self {
        info!("使用规则生成题目");
        Self {
            strategy: GenerationStrategy::RuleBased(RuleBasedStrategy),
            fallback: RuleBasedStrategy,
            degraded: false,
        }
    }

    /// 模型模式，使用指定的后端
    pub fn with_backend(backend: Arc<dyn ModelBackend>, timeout: Duration) -> Self {
        info!("使用模型生成题目: {}", backend.model_name());
        Self {
            strategy: GenerationStrategy::Model(ModelStrategy::new(backend, timeout)),
            fallback: RuleBasedStrategy,
            degraded: false,
        }
    }

    pub fn mode(&self) -> GeneratorMode {
        match self.strategy {
            GenerationStrategy::Model(_) => GeneratorMode::Model,
            GenerationStrategy::RuleBased(_) => GeneratorMode::RuleBased,
        }
    }

    pub fn info(&self) -> GeneratorInfo {
        let model_name = match &self.strategy {
            GenerationStrategy::Model(model) => model.model_name().to_string(),
            GenerationStrategy::RuleBased(_) => GeneratorMode::RuleBased.to_string(),
        };
        GeneratorInfo {
            model_name,
            mode: self.mode(),
            fallback_mode: self.degraded,
        }
    }

    /// 生成一道候选题目
    ///
    /// 模型失败时只对这一次改用规则生成
    pub async fn generate(
        &self,
        context: &str,
        question_type: QuestionType,
        difficulty: u8,
        rng: &mut (dyn RngCore + Send),
    ) -> Candidate {
        match &self.strategy {
            GenerationStrategy::Model(model) => {
                let result = model.generate(context, question_type, difficulty, rng).await;
                match result {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        warn!("⚠️ 模型生成 {} 失败，改用规则生成: {}", question_type, e);
                        self.fallback.generate(context, question_type, rng)
                    }
                }
            }
            GenerationStrategy::RuleBased(rules) => rules.generate(context, question_type, rng),
        }
    }
}

#[async_trait]
impl QuestionSource for QuestionGenerator {
    async fn generate(
        &self,
        context: &str,
        question_type: QuestionType,
        difficulty: u8,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<Candidate, GenerationError> {
        Ok(QuestionGenerator::generate(self, context, question_type, difficulty, rng).await)
    }
}

/// 判断题答案："True" / "False"
pub fn true_false_answer(context: &str) -> &'static str {
    let lowered = context.to_lowercase();
    if FACTUAL_INDICATORS.iter().any(|w| lowered.contains(w)) {
        "True"
    } else {
        "False"
    }
}

/// 开放题的标准答案；选择题和判断题的答案随题目生成，返回 `None`
pub fn canonical_answer(question_type: QuestionType) -> Option<&'static str> {
    match question_type {
        QuestionType::ShortAnswer => Some("Key points from the text"),
        QuestionType::LongAnswer => Some("Detailed explanation required"),
        QuestionType::Hots => Some("Application and analysis required"),
        QuestionType::Mcq | QuestionType::TrueFalse => None,
    }
}

/// 按字符截取前 `max_chars` 个字符
pub(crate) fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::GenerationError;
    use crate::infrastructure::ModelBackend;

    /// 按顺序返回预设回复，用完后返回 `EmptyResponse`
    pub struct ScriptedBackend {
        responses: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<(String, f32)>>,
    }

    impl ScriptedBackend {
        pub fn new<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// 记录的 (提示词, temperature)
        pub fn calls(&self) -> Vec<(String, f32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelBackend for ScriptedBackend {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), temperature));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GenerationError::EmptyResponse {
                    model: "scripted".to_string(),
                })
        }
    }

    /// 每次调用都睡眠一段时间
    pub struct SlowBackend {
        delay: Duration,
    }

    impl SlowBackend {
        pub fn new(delay: Duration) -> Self {
            Self { delay }
        }
    }

    #[async_trait]
    impl ModelBackend for SlowBackend {
        fn model_name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _prompt: &str, _temperature: f32) -> Result<String, GenerationError> {
            tokio::time::sleep(self.delay).await;
            Ok("Too late?".to_string())
        }
    }
}
