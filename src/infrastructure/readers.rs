//! 文档读取器 - 基础设施层
//!
//! 只负责"从字节中读出文本"，不做清洗和校验

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use std::panic;

use crate::models::DocumentFormat;

/// 按格式读取原始文本
pub trait TextReader: Send + Sync {
    /// 读取失败时返回原因（由调用方包装为 `ExtractionFailed`）
    fn read_text(&self, bytes: &[u8]) -> Result<String, String>;
}

/// PDF：逐页提取，非空页用换行拼接
pub struct PdfReader;

impl TextReader for PdfReader {
    fn read_text(&self, bytes: &[u8]) -> Result<String, String> {
        // pdf-extract 遇到部分畸形字体会 panic
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| "PDF 解析器异常退出".to_string())?
            .map_err(|e| e.to_string())?;

        tracing::debug!("PDF 共 {} 页", pages.len());
        Ok(join_pages(&pages))
    }
}

/// 跳过空白页，每页后接一个换行
fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page_text in pages.iter().filter(|p| !p.trim().is_empty()) {
        text.push_str(page_text);
        text.push('\n');
    }
    text
}

/// DOCX：段落文本用换行拼接
pub struct DocxReader;

impl TextReader for DocxReader {
    fn read_text(&self, bytes: &[u8]) -> Result<String, String> {
        let docx = read_docx(bytes).map_err(|e| format!("{:?}", e))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
                _ => None,
            })
            .collect();

        tracing::debug!("DOCX 共 {} 个段落", paragraphs.len());
        Ok(paragraphs.join("\n"))
    }
}

/// Paragraph → Run → Text，同一段落内的多个 run 直接拼接
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

/// 按格式选择读取器
pub fn reader_for(format: DocumentFormat) -> &'static dyn TextReader {
    match format {
        DocumentFormat::Pdf => &PdfReader,
        DocumentFormat::Docx => &DocxReader,
    }
}
