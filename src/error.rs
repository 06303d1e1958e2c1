use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档摄取错误（单个文件范围）
    #[error("摄取错误: {0}")]
    Ingest(#[from] IngestError),
    /// 题目生成错误（单次生成尝试范围）
    #[error("生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档摄取错误
///
/// 全部是"单文件"级别的错误，不会中断同一批次里的其他文件
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// 扩展名不在支持列表中
    #[error("不支持的文件类型 '{filename}'，允许的类型: {allowed}")]
    InvalidFormat { filename: String, allowed: String },

    /// 文件超过大小上限
    #[error("文件 '{filename}' 大小 {size} 字节，超过上限 {limit} 字节")]
    FileTooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },

    /// 无法解析（损坏或只有扫描图像）
    #[error("无法从 '{filename}' 中提取文本，文件可能已损坏或只包含图像: {reason}")]
    ExtractionFailed { filename: String, reason: String },

    /// 提取成功但去掉空白后为空
    #[error("文件 '{filename}' 中没有可提取的文本")]
    EmptyContent { filename: String },
}

/// 题目生成错误
///
/// 由策略回退（模型 → 规则）吸收，或者由编排层跳过对应的那一次尝试
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 模型后端调用失败
    #[error("模型调用失败 (模型: {model}): {source}")]
    Backend {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 模型调用超时
    #[error("模型调用超时 (模型: {model}, {seconds} 秒)")]
    Timeout { model: String, seconds: u64 },

    /// 模型返回内容为空
    #[error("模型返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },

    /// 模型后端不可用（初始化失败）
    #[error("模型后端不可用: {reason}")]
    Unavailable { reason: String },

    /// 生成器内部失败（回退后仍失败）
    #[error("题目生成失败: {0}")]
    Failed(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 字段取值超出范围
    #[error("配置项 {field} 取值无效: {reason}")]
    InvalidValue { field: String, reason: String },

    /// 配置结构不合法（JSON / TOML 形状错误）
    #[error("配置格式错误: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Malformed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Malformed(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl IngestError {
    /// 出错的文件名
    pub fn filename(&self) -> &str {
        match self {
            IngestError::InvalidFormat { filename, .. }
            | IngestError::FileTooLarge { filename, .. }
            | IngestError::ExtractionFailed { filename, .. }
            | IngestError::EmptyContent { filename } => filename,
        }
    }

    /// 创建提取失败错误
    pub fn extraction_failed(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        IngestError::ExtractionFailed {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}

impl GenerationError {
    /// 创建模型调用失败错误
    pub fn backend(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerationError::Backend {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

impl AppError {
    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_keeps_filename() {
        let err = IngestError::EmptyContent {
            filename: "notes.pdf".to_string(),
        };
        assert_eq!(err.filename(), "notes.pdf");
        assert!(err.to_string().contains("notes.pdf"));
    }

    #[test]
    fn test_app_error_wraps_config_error() {
        let err: AppError = ConfigError::InvalidValue {
            field: "difficulty".to_string(),
            reason: "必须在 1-5 之间".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("difficulty"));
    }
}
