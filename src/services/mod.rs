//! 业务能力层（Services）
//!
//! 每个模块只处理"一个单位"的工作：一段文本、一个文件、一道题

pub mod chunker;
pub mod concept_extractor;
pub mod generation;
pub mod ingestor;
pub mod normalizer;
pub mod tokenizer;

pub use chunker::Chunker;
pub use concept_extractor::{extract_concepts, extract_key_concepts};
pub use generation::{
    Candidate, GenerationStrategy, GeneratorInfo, QuestionGenerator, QuestionSource,
};
pub use ingestor::Ingestor;
pub use normalizer::clean;
pub use tokenizer::{sent_tokenize, word_tokenize};
