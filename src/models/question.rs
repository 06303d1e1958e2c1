use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 单项选择题
    Mcq,
    /// 判断题
    TrueFalse,
    /// 简答题
    ShortAnswer,
    /// 论述题
    LongAnswer,
    /// 高阶思维题（应用 / 分析）
    Hots,
}

impl QuestionType {
    /// 编排时的固定题型顺序
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Mcq,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
        QuestionType::LongAnswer,
        QuestionType::Hots,
    ];

    /// 标准名称（与序列化名称一致）
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::LongAnswer => "long_answer",
            QuestionType::Hots => "hots",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorMode {
    /// 模型生成
    #[serde(rename = "model")]
    Model,
    /// 规则生成（确定性，始终可用）
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl GeneratorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorMode::Model => "model",
            GeneratorMode::RuleBased => "rule-based",
        }
    }
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "model" | "llm" => Ok(GeneratorMode::Model),
            "rule-based" | "rule_based" | "rules" => Ok(GeneratorMode::RuleBased),
            other => Err(format!("未知的生成模式: {}", other)),
        }
    }
}

/// 生成的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    /// 只有选择题有选项：恰好 4 个，顺序随机，正确答案只出现一次
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub quality_score: f64,
    pub difficulty: u8,
    pub generator_mode: GeneratorMode,
}

/// 答案条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    pub question: String,
    pub answer: String,
}

/// 一次生成的结果
///
/// `questions` 与 `answer_key` 按生成顺序一一对应，只能成对追加
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationResult {
    questions: Vec<GeneratedQuestion>,
    answer_key: Vec<AnswerKeyEntry>,
}

impl GenerationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一道题及其答案
    pub fn push(&mut self, question: GeneratedQuestion, answer: AnswerKeyEntry) {
        self.questions.push(question);
        self.answer_key.push(answer);
    }

    pub fn questions(&self) -> &[GeneratedQuestion] {
        &self.questions
    }

    pub fn answer_key(&self) -> &[AnswerKeyEntry] {
        &self.answer_key
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 按生成顺序遍历 (题目, 答案)
    pub fn iter(&self) -> impl Iterator<Item = (&GeneratedQuestion, &AnswerKeyEntry)> {
        self.questions.iter().zip(self.answer_key.iter())
    }
}
