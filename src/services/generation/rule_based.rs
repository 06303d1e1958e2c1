//! 规则生成策略
//!
//! 确定性模板，始终可用；`difficulty` 在这里不起作用

use rand::seq::SliceRandom;
use rand::RngCore;

use super::{canonical_answer, prefix_chars, true_false_answer, Candidate};
use crate::models::{GeneratorMode, QuestionType};

pub const DEFAULT_CORRECT_ANSWER: &str = "The main topic of the text";

pub const RULE_DISTRACTORS: [&str; 3] = [
    "A secondary topic",
    "An unrelated subject",
    "None of the above",
];

const TRUE_FALSE_TEMPLATE: &str = "The text contains factual information that can be verified?";
const SHORT_ANSWER_TEMPLATE: &str = "What are the key points discussed in this text?";
const LONG_ANSWER_TEMPLATE: &str =
    "Can you explain in detail the main concepts and their relationships as discussed in this text?";
const HOTS_TEMPLATE: &str =
    "How would you apply the concepts from this text to solve a real-world problem?";

/// 规则生成策略
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedStrategy;

impl RuleBasedStrategy {
    pub fn generate(
        &self,
        context: &str,
        question_type: QuestionType,
        rng: &mut (dyn RngCore + Send),
    ) -> Candidate {
        match question_type {
            QuestionType::Mcq => {
                let mut options: Vec<String> = std::iter::once(DEFAULT_CORRECT_ANSWER)
                    .chain(RULE_DISTRACTORS)
                    .map(str::to_string)
                    .collect();
                options.shuffle(rng);

                Candidate {
                    question: mcq_stem(context),
                    options: Some(options),
                    answer: DEFAULT_CORRECT_ANSWER.to_string(),
                    mode: GeneratorMode::RuleBased,
                }
            }
            QuestionType::TrueFalse => Candidate::open(
                template(question_type),
                true_false_answer(context),
                GeneratorMode::RuleBased,
            ),
            open_ended => Candidate::open(
                template(open_ended),
                canonical_answer(open_ended).unwrap_or_default(),
                GeneratorMode::RuleBased,
            ),
        }
    }
}

/// 非选择题的固定模板（选择题题干见 `mcq_stem`）
fn template(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::TrueFalse => TRUE_FALSE_TEMPLATE,
        QuestionType::LongAnswer => LONG_ANSWER_TEMPLATE,
        QuestionType::Hots => HOTS_TEMPLATE,
        QuestionType::Mcq | QuestionType::ShortAnswer => SHORT_ANSWER_TEMPLATE,
    }
}

/// 选择题题干：取第一个句点前的内容，太短（< 20 字符）则改用前 100 个字符
fn mcq_stem(context: &str) -> String {
    let first = context.split('.').next().unwrap_or_default().trim();
    let subject = if first.chars().count() < 20 {
        format!("{}...", prefix_chars(context, 100))
    } else {
        first.to_string()
    };
    format!(
        "What is the main topic discussed in: '{}...'?",
        prefix_chars(&subject, 50)
    )
}
