//! End-to-end generation pipeline: keyword → research → plan → article → files.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use seowriter_provider::AiProvider;
use seowriter_research::ResearchCollector;
use seowriter_shared::{
    AppConfig, ContentPlan, ExportedFile, LanguagePolicy, Outcome, OutputFormat, Result,
};

use crate::exporter::FileExporter;
use crate::keyword::{self, Keyword};
use crate::planner::ContentPlanner;
use crate::writer::ArticleWriter;

/// Configuration for one [`generate_article`] run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory the article files are written to.
    pub output_dir: PathBuf,
    /// Keyword word limit.
    pub max_keyword_words: usize,
    /// Which renderings to export.
    pub format: OutputFormat,
    /// Language instruction handed to the writer.
    pub language: LanguagePolicy,
}

impl From<&AppConfig> for GenerateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.defaults.output_dir),
            max_keyword_words: config.defaults.max_keyword_words,
            format: config.defaults.format,
            language: config.writer.language_policy(),
        }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct GenerateResult {
    /// The normalized keyword.
    pub keyword: Keyword,
    /// Number of research records used as context.
    pub source_count: usize,
    /// Whether the web search failed and the run continued without research.
    pub research_degraded: bool,
    /// The plan the article was written from.
    pub plan: Outcome<ContentPlan>,
    /// Approximate article length.
    pub word_count: usize,
    /// Files written, Markdown first.
    pub files: Vec<ExportedFile>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// A pipeline stage that just finished.
#[derive(Debug, Clone, Copy)]
pub enum StageReport<'a> {
    Researched { sources: usize },
    Planned { main_topic: &'a str, fallback: bool },
    Written { words: usize },
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a stage completes.
    fn stage_done(&self, report: StageReport<'_>);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn stage_done(&self, _report: StageReport<'_>) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Run the full pipeline for one keyword.
///
/// 1. Normalize and validate the keyword
/// 2. Connect to the AI backend (`connect`)
/// 3. Web research (fail-open)
/// 4. Content plan (fail-open on unparseable replies)
/// 5. Article
/// 6. Export per `config.format`
///
/// The backend is only connected once the keyword is known to be valid, so a
/// bad keyword is reported before a missing API key. Nothing is written to
/// disk unless every earlier step succeeded.
#[instrument(skip_all, fields(keyword = %raw_keyword, format = ?config.format))]
pub async fn generate_article<F>(
    raw_keyword: &str,
    config: &GenerateConfig,
    research: &ResearchCollector,
    connect: F,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult>
where
    F: FnOnce() -> Result<Box<dyn AiProvider>>,
{
    let start = Instant::now();
    let keyword = keyword::process(raw_keyword, config.max_keyword_words)?;
    let provider = connect()?;

    info!(keyword = %keyword, provider = provider.name(), "starting generate pipeline");

    // --- Research ---
    progress.phase("Researching keyword");
    let research_outcome = research.search(keyword.as_str()).await;
    let research_degraded = research_outcome.is_fallback();
    let research = research_outcome.into_value();
    progress.stage_done(StageReport::Researched {
        sources: research.len(),
    });

    // --- Plan ---
    progress.phase("Creating content plan");
    let plan = ContentPlanner::new(provider.as_ref())
        .create_plan(&keyword, &research)
        .await?;
    progress.stage_done(StageReport::Planned {
        main_topic: &plan.value().main_topic,
        fallback: plan.is_fallback(),
    });

    // --- Write ---
    progress.phase("Writing article");
    let article = ArticleWriter::new(provider.as_ref(), config.language.clone())
        .write_article(plan.value(), &research)
        .await?;
    let word_count = article.word_count();
    progress.stage_done(StageReport::Written { words: word_count });

    // --- Export ---
    progress.phase("Saving article");
    let exporter = FileExporter::new(&config.output_dir);
    let html = config
        .format
        .wants_html()
        .then(|| crate::exporter::html_page(keyword.as_str(), &article.markdown));

    let mut files = Vec::with_capacity(2);
    if config.format.wants_markdown() {
        files.push(exporter.save_article(keyword.as_str(), &article.markdown, "md")?);
    }
    if let Some(page) = &html {
        match exporter.save_article(keyword.as_str(), page, "html") {
            Ok(file) => files.push(file),
            Err(e) => {
                discard(&files);
                return Err(e);
            }
        }
    }

    let result = GenerateResult {
        keyword,
        source_count: research.len(),
        research_degraded,
        plan,
        word_count,
        files,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        keyword = %result.keyword,
        sources = result.source_count,
        plan_fallback = result.plan.is_fallback(),
        words = result.word_count,
        files = result.files.len(),
        elapsed_ms = result.elapsed.as_millis(),
        "generate pipeline complete"
    );

    Ok(result)
}

/// Remove files written earlier in a run that then failed.
fn discard(files: &[ExportedFile]) {
    for file in files {
        if let Err(e) = std::fs::remove_file(&file.path) {
            warn!(path = %file.path.display(), error = %e, "could not remove partial output");
        }
    }
}
