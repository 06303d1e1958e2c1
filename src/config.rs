use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::GeneratorMode;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 摄取配置 ---
    /// 单个文件大小上限（MB）
    pub max_file_size_mb: usize,
    /// 每个文本块的目标 token 数
    pub chunk_size: usize,
    /// 提取的关键概念数量
    pub key_concepts: usize,
    // --- 生成配置 ---
    /// 请求的生成模式（模型不可用时会自动退回规则模式）
    pub generator_mode: GeneratorMode,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次模型调用超时（秒）
    pub llm_timeout_secs: u64,
    // --- 批处理配置 ---
    /// 待处理文档目录
    pub input_folder: String,
    /// 结果输出目录
    pub output_folder: String,
    /// 题目数量配置（TOML）
    pub generation_config_path: String,
    /// 同时处理的文件数量
    pub max_concurrent_files: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            chunk_size: 512,
            key_concepts: 10,
            generator_mode: GeneratorMode::Model,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 30,
            input_folder: "input_docs".to_string(),
            output_folder: "output_questions".to_string(),
            generation_config_path: "generation.toml".to_string(),
            max_concurrent_files: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，无法解析的值退回默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_file_size_mb),
            chunk_size: std::env::var("CHUNK_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.chunk_size),
            key_concepts: std::env::var("KEY_CONCEPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.key_concepts),
            generator_mode: std::env::var("GENERATOR_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.generator_mode),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            generation_config_path: std::env::var("GENERATION_CONFIG_PATH").unwrap_or(default.generation_config_path),
            max_concurrent_files: std::env::var("MAX_CONCURRENT_FILES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_files),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 严格模式：已设置但无法解析的环境变量直接报错
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            max_file_size_mb: parse_env("MAX_FILE_SIZE_MB", "usize")?.unwrap_or(default.max_file_size_mb),
            chunk_size: parse_env("CHUNK_SIZE", "usize")?.unwrap_or(default.chunk_size),
            key_concepts: parse_env("KEY_CONCEPTS", "usize")?.unwrap_or(default.key_concepts),
            generator_mode: parse_env("GENERATOR_MODE", "GeneratorMode")?.unwrap_or(default.generator_mode),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", "u64")?.unwrap_or(default.llm_timeout_secs),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            generation_config_path: std::env::var("GENERATION_CONFIG_PATH").unwrap_or(default.generation_config_path),
            max_concurrent_files: parse_env("MAX_CONCURRENT_FILES", "usize")?.unwrap_or(default.max_concurrent_files),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        })
    }

    /// 文件大小上限（字节）
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_ten_megabytes() {
        let config = Config::default();
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.chunk_size, 512);
        assert_eq!(config.generator_mode, GeneratorMode::Model);
    }

    #[test]
    fn test_parse_env_reports_bad_value() {
        std::env::set_var("QF_TEST_BAD_CHUNK", "many");
        let result: Result<Option<usize>, _> = parse_env("QF_TEST_BAD_CHUNK", "usize");
        std::env::remove_var("QF_TEST_BAD_CHUNK");
        assert!(matches!(
            result,
            Err(ConfigError::EnvVarParseFailed { ref value, .. }) if value == "many"
        ));
    }

    #[test]
    fn test_try_from_env_rejects_bad_timeout() {
        std::env::set_var("LLM_TIMEOUT_SECS", "soon");
        let result = Config::try_from_env();
        std::env::remove_var("LLM_TIMEOUT_SECS");
        assert!(matches!(
            result,
            Err(ConfigError::EnvVarParseFailed { ref var_name, ref expected_type, .. })
                if var_name == "LLM_TIMEOUT_SECS" && expected_type == "u64"
        ));
    }

    #[test]
    fn test_file_size_budget_saturates() {
        let config = Config {
            max_file_size_mb: usize::MAX,
            ..Config::default()
        };
        assert_eq!(config.max_file_size_bytes(), usize::MAX);
    }

    #[test]
    fn test_parse_env_missing_is_none() {
        let result: Option<usize> = parse_env("QF_TEST_SURELY_UNSET", "usize").unwrap();
        assert!(result.is_none());
    }
}
