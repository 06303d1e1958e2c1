use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 支持的文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// 按页组织
    Pdf,
    /// 按段落组织
    Docx,
}

impl DocumentFormat {
    pub const SUPPORTED: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Docx];

    /// 从文件名的扩展名识别格式（不区分大小写）
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())?
            .to_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
        }
    }

    /// 用于错误信息的扩展名列表
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 文本块：按句子对齐、token 数有上限的一段文本
///
/// 生成后不可修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    tokens: Vec<String>,
}

impl Chunk {
    pub(crate) fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// 以空格拼接的文本
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// 关键概念及其出现次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub term: String,
    pub frequency: usize,
}

/// 单个文件的摄取结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub raw_text: String,
    pub cleaned_text: String,
    pub chunks: Vec<String>,
    pub key_concepts: Vec<String>,
}

/// 按文件名汇总的结果条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Success(ProcessedDocument),
    Error { message: String },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success(_))
    }
}
