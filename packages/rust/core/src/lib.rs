//! Article pipeline orchestration and domain logic for the SEO writer.
//!
//! This crate ties together keyword normalization, web research, content
//! planning, article writing and file export into a single end-to-end run
//! (see [`pipeline::generate_article`]).

pub mod exporter;
pub mod keyword;
pub mod pipeline;
pub mod planner;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;
