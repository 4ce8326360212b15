//! SEO Writer CLI: turn a target keyword into a researched, long-form article.
//!
//! Runs web research, asks an AI backend for a content plan and then the
//! article itself, and saves the result as Markdown and/or HTML.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    // A missing .env is normal; the key may come from the real environment.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
