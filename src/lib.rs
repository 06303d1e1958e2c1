//! # Question Forge
//!
//! 从文档（PDF / DOCX）自动生成带答案的练习题
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `PdfReader` / `DocxReader` - 从字节中读出文本
//! - `LlmBackend` - OpenAI 兼容的模型后端（`ModelBackend` trait）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每次只处理一个单位
//! - `normalizer` / `tokenizer` / `chunker` / `concept_extractor` - 文本处理
//! - `Ingestor` - 校验 + 提取 + 清洗 + 分块
//! - `QuestionGenerator` - 模型 / 规则两种策略，附带校验和质量评分
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（题型 + 序号 + 文本块）
//! - `QuestionFlow` - 流程编排（生成 → 校验 → 评分 → 组装）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/question_orchestrator` - 按配额出题，单题失败不影响其他题
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, ConfigError, GenerationError, IngestError};
pub use infrastructure::{LlmBackend, ModelBackend};
pub use models::{
    AnswerKeyEntry, Chunk, Concept, FileOutcome, GeneratedQuestion, GenerationConfig,
    GenerationResult, GeneratorMode, ProcessedDocument, QuestionType,
};
pub use orchestrator::{App, GenerationStats, Orchestrator};
pub use services::{
    chunker::split, clean, extract_key_concepts, GeneratorInfo, Ingestor, QuestionGenerator,
    QuestionSource,
};
pub use workflow::{ProcessResult, QuestionCtx, QuestionFlow};
