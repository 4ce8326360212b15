//! Shared types, error model, and configuration for the SEO writer.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`SeoWriterError`] — the unified error type
//! - Domain types ([`ResearchResult`], [`ContentPlan`], [`Article`], [`Outcome`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AiConfig, AppConfig, DefaultsConfig, LanguagePolicy, MATCH_PLAN_LANGUAGE, ResearchConfig,
    WriterConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    require_api_key, validate_api_key,
};
pub use error::{ErrorKind, Result, SeoWriterError};
pub use types::{
    Article, ContentPlan, ExportedFile, OutlineSection, Outcome, OutputFormat, ResearchResult,
    SearchHit, SearchIntent,
};
