//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责配额调度和批量处理，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载文档（Vec<SourceDocument>）
//! - 控制并发数量（Semaphore）
//! - 写出每个文档的题库 JSON
//! - 输出全局统计信息
//!
//! ### `question_orchestrator` - 单个文档的出题编排
//! - 按固定题型顺序遍历配额
//! - 每个题型独立地轮转使用有效文本块
//! - 创建并复用 QuestionFlow
//! - 单道题失败只跳过这一道
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<SourceDocument>)
//!     ↓
//! services::Ingestor (单个文档 → 文本块)
//!     ↓
//! question_orchestrator (处理一个文档的全部配额)
//!     ↓
//! workflow::QuestionFlow (处理单道题)
//!     ↓
//! services (能力层：generation / quality)
//!     ↓
//! infrastructure (基础设施：readers / llm_backend)
//! ```

pub mod batch_processor;
pub mod question_orchestrator;

// 重新导出主要类型
pub use batch_processor::App;
pub use question_orchestrator::{GenerationStats, Orchestrator};
