pub mod document_loader;
pub mod toml_loader;

pub use document_loader::{load_all_documents, SourceDocument};
pub use toml_loader::load_generation_config;
