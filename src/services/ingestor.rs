//! 文档摄取 - 业务能力层
//!
//! 校验 → 提取 → 清洗 → 分块 + 关键概念
//!
//! 每个文件独立处理：一个文件失败只会得到它自己的 `FileOutcome::Error`，
//! 不影响同一批次里的其他文件。

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::IngestError;
use crate::infrastructure::reader_for;
use crate::models::{DocumentFormat, FileOutcome, ProcessedDocument};
use crate::services::chunker::Chunker;
use crate::services::concept_extractor::{extract_key_concepts, DEFAULT_TOP_N};
use crate::services::normalizer;

pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// 文档摄取器
#[derive(Debug, Clone)]
pub struct Ingestor {
    max_file_size_bytes: usize,
    chunker: Chunker,
    top_n: usize,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_N)
    }
}

impl Ingestor {
    pub fn new(max_file_size_bytes: usize, chunk_size: usize, top_n: usize) -> Self {
        Self {
            max_file_size_bytes,
            chunker: Chunker::new(chunk_size),
            top_n,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes(),
            config.chunk_size,
            config.key_concepts,
        )
    }

    /// 校验扩展名和大小，返回识别出的格式
    pub fn validate(&self, bytes: &[u8], filename: &str) -> Result<DocumentFormat, IngestError> {
        let format =
            DocumentFormat::from_filename(filename).ok_or_else(|| IngestError::InvalidFormat {
                filename: filename.to_string(),
                allowed: DocumentFormat::supported_list(),
            })?;

        if bytes.len() > self.max_file_size_bytes {
            return Err(IngestError::FileTooLarge {
                filename: filename.to_string(),
                size: bytes.len(),
                limit: self.max_file_size_bytes,
            });
        }

        Ok(format)
    }

    /// 提取原始文本
    pub fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, IngestError> {
        let format = self.validate(bytes, filename)?;

        let text = reader_for(format)
            .read_text(bytes)
            .map_err(|reason| IngestError::extraction_failed(filename, reason))?;

        if text.trim().is_empty() {
            return Err(IngestError::EmptyContent {
                filename: filename.to_string(),
            });
        }

        debug!("从 {} 中提取了 {} 个字符", filename, text.chars().count());
        Ok(text)
    }

    /// 处理单个文件
    pub fn process_file(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ProcessedDocument, IngestError> {
        let raw_text = self.extract(bytes, filename)?;
        let cleaned_text = normalizer::clean(&raw_text);

        let chunks = self
            .chunker
            .split(&cleaned_text)
            .iter()
            .map(|chunk| chunk.text())
            .collect();
        let key_concepts = extract_key_concepts(&cleaned_text, self.top_n);

        Ok(ProcessedDocument {
            raw_text,
            cleaned_text,
            chunks,
            key_concepts,
        })
    }

    /// 处理一批文件，结果按输入顺序以文件名为键
    pub fn process_files<B: AsRef<[u8]>>(
        &self,
        files: &[(String, B)],
    ) -> IndexMap<String, FileOutcome> {
        let mut outcomes = IndexMap::with_capacity(files.len());

        for (filename, bytes) in files {
            let outcome = match self.process_file(bytes.as_ref(), filename) {
                Ok(document) => {
                    info!(
                        "✓ {} 处理完成: {} 个块, {} 个关键概念",
                        filename,
                        document.chunks.len(),
                        document.key_concepts.len()
                    );
                    FileOutcome::Success(document)
                }
                Err(e) => {
                    warn!("⚠️ {} 处理失败: {}", filename, e);
                    FileOutcome::Error {
                        message: e.to_string(),
                    }
                }
            };
            outcomes.insert(filename.clone(), outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::readers::test_support::{make_test_docx, make_test_pdf};

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let err = Ingestor::default()
            .validate(b"hello", "notes.txt")
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidFormat { .. }));
        assert_eq!(err.filename(), "notes.txt");
    }

    #[test]
    fn test_validate_extension_case_insensitive() {
        let ingestor = Ingestor::default();
        assert_eq!(
            ingestor.validate(b"x", "REPORT.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            ingestor.validate(b"x", "essay.Docx").unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_validate_rejects_large_file() {
        let ingestor = Ingestor::new(8, 512, 10);
        let err = ingestor.validate(&[0u8; 9], "big.pdf").unwrap_err();
        assert_eq!(
            err,
            IngestError::FileTooLarge {
                filename: "big.pdf".to_string(),
                size: 9,
                limit: 8,
            }
        );
        assert!(ingestor.validate(&[0u8; 8], "ok.pdf").is_ok());
    }

    #[test]
    fn test_extract_corrupt_file() {
        let err = Ingestor::default()
            .extract(b"garbage", "broken.docx")
            .unwrap_err();
        assert!(matches!(err, IngestError::ExtractionFailed { .. }));
    }

    #[test]
    fn test_extract_blank_docx_is_empty_content() {
        let bytes = make_test_docx(&["   ", ""]);
        let err = Ingestor::default()
            .extract(&bytes, "blank.docx")
            .unwrap_err();
        assert!(matches!(err, IngestError::EmptyContent { .. }));
    }

    #[test]
    fn test_process_docx() {
        let bytes = make_test_docx(&[
            "Photosynthesis converts light energy into chemical energy.",
            "Plants use photosynthesis to produce glucose. See https://example.org/plants for more.",
        ]);
        let document = Ingestor::new(DEFAULT_MAX_FILE_SIZE_BYTES, 8, 5)
            .process_file(&bytes, "biology.docx")
            .unwrap();

        assert!(document.raw_text.contains('\n'));
        assert!(!document.cleaned_text.contains('\n'));
        assert!(!document.cleaned_text.contains("example.org"));
        assert!(document.chunks.len() >= 2);
        assert_eq!(document.key_concepts[0], "photosynthesis");
        assert!(document.key_concepts.len() <= 5);
    }

    #[test]
    fn test_process_files_isolates_failures() {
        let files = vec![
            ("a.docx".to_string(), make_test_docx(&["The solar system has eight planets."])),
            ("b.txt".to_string(), b"plain text".to_vec()),
            ("c.pdf".to_string(), make_test_pdf("Mars is the fourth planet from the Sun")),
            ("d.pdf".to_string(), b"not a pdf".to_vec()),
        ];

        let outcomes = Ingestor::default().process_files(&files);

        let keys: Vec<&str> = outcomes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.docx", "b.txt", "c.pdf", "d.pdf"]);
        assert!(outcomes["a.docx"].is_success());
        assert!(!outcomes["b.txt"].is_success());
        assert!(outcomes["c.pdf"].is_success());
        assert!(!outcomes["d.pdf"].is_success());

        let json = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(json["a.docx"]["status"], "success");
        assert_eq!(json["b.txt"]["status"], "error");
        assert!(json["b.txt"]["message"].as_str().unwrap().contains("b.txt"));
    }
}
