//! 基础设施层（Infrastructure）
//!
//! 持有外部资源，只暴露能力：
//! - `readers` - PDF / DOCX 文本读取
//! - `llm_backend` - OpenAI 兼容的模型后端

pub mod llm_backend;
pub mod readers;

pub use llm_backend::{LlmBackend, ModelBackend};
pub use readers::{reader_for, DocxReader, PdfReader, TextReader};
