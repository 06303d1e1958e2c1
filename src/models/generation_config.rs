//! 题目数量配置
//!
//! 每种题型的数量、难度，以及透传的元数据（标题 / 学科 / 课程），核心流程不解释元数据

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::ConfigError;
use crate::models::question::QuestionType;

pub const DEFAULT_DIFFICULTY: u8 = 3;
pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

/// 生成配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub num_mcq: u32,
    #[serde(default)]
    pub num_true_false: u32,
    #[serde(default)]
    pub num_short_answer: u32,
    #[serde(default)]
    pub num_long_answer: u32,
    #[serde(default)]
    pub num_hots: u32,
    /// 难度 1-5
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(flatten)]
    pub metadata: GenerationMetadata,
}

/// 透传元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<String>,
    /// 其他未知字段原样保留
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_mcq: 0,
            num_true_false: 0,
            num_short_answer: 0,
            num_long_answer: 0,
            num_hots: 0,
            difficulty: DEFAULT_DIFFICULTY,
            metadata: GenerationMetadata::default(),
        }
    }
}

impl GenerationConfig {
    /// 从 JSON 字符串解析并校验
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从已解析的 JSON 值解析并校验
    pub fn from_value(value: JsonValue) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ConfigError::InvalidValue {
                field: "difficulty".to_string(),
                reason: format!(
                    "必须在 {}-{} 之间，实际为 {}",
                    MIN_DIFFICULTY, MAX_DIFFICULTY, self.difficulty
                ),
            });
        }
        Ok(())
    }

    /// 某个题型的数量
    pub fn quota(&self, question_type: QuestionType) -> u32 {
        match question_type {
            QuestionType::Mcq => self.num_mcq,
            QuestionType::TrueFalse => self.num_true_false,
            QuestionType::ShortAnswer => self.num_short_answer,
            QuestionType::LongAnswer => self.num_long_answer,
            QuestionType::Hots => self.num_hots,
        }
    }

    /// 设置某个题型的数量（链式）
    pub fn with_quota(mut self, question_type: QuestionType, count: u32) -> Self {
        match question_type {
            QuestionType::Mcq => self.num_mcq = count,
            QuestionType::TrueFalse => self.num_true_false = count,
            QuestionType::ShortAnswer => self.num_short_answer = count,
            QuestionType::LongAnswer => self.num_long_answer = count,
            QuestionType::Hots => self.num_hots = count,
        }
        self
    }

    /// 请求的题目总数
    pub fn total_requested(&self) -> u32 {
        QuestionType::ALL
            .iter()
            .fold(0u32, |total, t| total.saturating_add(self.quota(*t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = GenerationConfig::from_json(r#"{"num_mcq": 2}"#).unwrap();
        assert_eq!(config.num_mcq, 2);
        assert_eq!(config.num_hots, 0);
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.total_requested(), 2);
    }

    #[test]
    fn test_metadata_passthrough() {
        let config = GenerationConfig::from_value(json!({
            "num_true_false": 1,
            "title": "Unit 3",
            "subject": "Astronomy",
            "curriculum": "General Science",
            "school": "North High"
        }))
        .unwrap();
        assert_eq!(config.metadata.title.as_deref(), Some("Unit 3"));
        assert_eq!(config.metadata.curriculum.as_deref(), Some("General Science"));
        assert_eq!(config.metadata.extra["school"], "North High");
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = GenerationConfig::from_json(r#"{"num_mcq": "two"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));

        let err = GenerationConfig::from_json(r#"{"num_mcq": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_difficulty_out_of_range() {
        let err = GenerationConfig::from_json(r#"{"difficulty": 9}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_total_requested_saturates() {
        let config = GenerationConfig::default()
            .with_quota(QuestionType::Mcq, u32::MAX)
            .with_quota(QuestionType::Hots, 5);
        assert_eq!(config.total_requested(), u32::MAX);
    }

    #[test]
    fn test_with_quota() {
        let config = GenerationConfig::default()
            .with_quota(QuestionType::Hots, 2)
            .with_quota(QuestionType::LongAnswer, 1);
        assert_eq!(config.quota(QuestionType::Hots), 2);
        assert_eq!(config.quota(QuestionType::LongAnswer), 1);
        assert_eq!(config.total_requested(), 3);
    }
}
