// src/extractors/mod.rs
pub mod changelog;
pub mod config;

// Re-export key extraction types for convenience
pub use changelog::{ChangelogEntry, ChangelogExtractor, ChangelogTable};
pub use config::ExtractorConfig;
