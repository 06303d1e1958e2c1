pub mod document;
pub mod generation_config;
pub mod loaders;
pub mod question;

pub use document::{Chunk, Concept, DocumentFormat, FileOutcome, ProcessedDocument};
pub use generation_config::{GenerationConfig, GenerationMetadata};
pub use loaders::{load_all_documents, load_generation_config, SourceDocument};
pub use question::{AnswerKeyEntry, GeneratedQuestion, GenerationResult, GeneratorMode, QuestionType};
