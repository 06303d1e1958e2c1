//! 模型生成策略
//!
//! 每次后端调用都有超时；任何一步失败都会让整次生成返回错误，
//! 由 `QuestionGenerator` 改用规则生成。

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::RngCore;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::rule_based::DEFAULT_CORRECT_ANSWER;
use super::{canonical_answer, prefix_chars, true_false_answer, Candidate};
use crate::error::GenerationError;
use crate::infrastructure::ModelBackend;
use crate::models::generation_config::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::models::{GeneratorMode, QuestionType};

const CONTEXT_PROMPT_CHARS: usize = 500;
const DISTRACTOR_TEMPERATURE: f32 = 0.8;
const DISTRACTOR_COUNT: usize = 3;
const MIN_ANSWER_CHARS: usize = 5;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("空白正则无效"));

static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(question|q|answer|a):\s*").expect("标签正则无效")
});

/// 模型生成策略
pub struct ModelStrategy {
    backend: Arc<dyn ModelBackend>,
    timeout: Duration,
}

impl ModelStrategy {
    pub fn new(backend: Arc<dyn ModelBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub async fn generate(
        &self,
        context: &str,
        question_type: QuestionType,
        difficulty: u8,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<Candidate, GenerationError> {
        let temperature = temperature_for(difficulty);
        let question = self
            .generate_question(context, question_type, temperature)
            .await?;

        let candidate = match question_type {
            QuestionType::Mcq => {
                let answer = self.generate_correct_answer(context, temperature).await?;
                let distractors = self.generate_distractors(&question, &answer).await?;

                let mut options = Vec::with_capacity(DISTRACTOR_COUNT + 1);
                options.push(answer.clone());
                options.extend(distractors);
                options.shuffle(rng);

                Candidate {
                    question,
                    options: Some(options),
                    answer,
                    mode: GeneratorMode::Model,
                }
            }
            QuestionType::TrueFalse => {
                Candidate::open(question, true_false_answer(context), GeneratorMode::Model)
            }
            open_ended => Candidate::open(
                question,
                canonical_answer(open_ended).unwrap_or_default(),
                GeneratorMode::Model,
            ),
        };

        Ok(candidate)
    }

    async fn generate_question(
        &self,
        context: &str,
        question_type: QuestionType,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let raw = self
            .call(&question_prompt(context, question_type), temperature)
            .await?;
        Ok(clean_generated_text(&raw))
    }

    /// 用简答题提示词生成正确答案，过短时使用默认答案
    async fn generate_correct_answer(
        &self,
        context: &str,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let raw = self
            .call(
                &question_prompt(context, QuestionType::ShortAnswer),
                temperature,
            )
            .await?;
        let answer = strip_label(&collapse_whitespace(&raw));

        if answer.chars().count() < MIN_ANSWER_CHARS {
            debug!("模型答案过短，使用默认答案");
            return Ok(DEFAULT_CORRECT_ANSWER.to_string());
        }
        Ok(answer)
    }

    async fn generate_distractors(
        &self,
        question: &str,
        correct_answer: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let prompt = format!(
            "Generate 3 incorrect but plausible answers for this question: {}",
            question
        );
        let raw = self.call(&prompt, DISTRACTOR_TEMPERATURE).await?;
        Ok(parse_distractors(&raw, correct_answer))
    }

    /// 带超时的后端调用
    async fn call(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        tokio::time::timeout(self.timeout, self.backend.complete(prompt, temperature))
            .await
            .map_err(|_| GenerationError::Timeout {
                model: self.backend.model_name().to_string(),
                seconds: self.timeout.as_secs(),
            })?
    }
}

/// 难度越高 temperature 越高：0.7 + 0.1 × 难度
fn temperature_for(difficulty: u8) -> f32 {
    let difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    0.7 + 0.1 * f32::from(difficulty)
}

fn question_prompt(context: &str, question_type: QuestionType) -> String {
    let excerpt = prefix_chars(context, CONTEXT_PROMPT_CHARS);
    let kind = match question_type {
        QuestionType::Mcq => "a multiple choice question",
        QuestionType::TrueFalse => "a true/false question",
        QuestionType::ShortAnswer => "a short answer question",
        QuestionType::LongAnswer => "a detailed question requiring explanation",
        QuestionType::Hots => "a higher-order thinking question",
    };
    format!("Generate {} from this text: {}", kind, excerpt)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn strip_label(text: &str) -> String {
    LABEL_PREFIX.replace(text, "").trim().to_string()
}

/// 整理模型输出的题目：压缩空白、去掉 "Question:" 之类的前缀、首字母大写、补问号
pub fn clean_generated_text(text: &str) -> String {
    let stripped = strip_label(&collapse_whitespace(text));

    let mut chars = stripped.chars();
    let mut cleaned: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if !cleaned.ends_with('?') {
        cleaned.push('?');
    }
    cleaned
}

/// 解析逗号分隔的干扰项：去重（不区分大小写，也不能与正确答案相同），
/// 最多取 3 个，不足时用 "Option B"、"Option C"… 补齐
pub fn parse_distractors(text: &str, correct_answer: &str) -> Vec<String> {
    let mut seen = vec![correct_answer.trim().to_lowercase()];
    let mut distractors = Vec::with_capacity(DISTRACTOR_COUNT);

    for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if distractors.len() == DISTRACTOR_COUNT {
            break;
        }
        let key = item.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            distractors.push(item.to_string());
        }
    }

    for letter in 'B'..='Z' {
        if distractors.len() == DISTRACTOR_COUNT {
            break;
        }
        let placeholder = format!("Option {}", letter);
        let key = placeholder.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            distractors.push(placeholder);
        }
    }

    distractors
}
