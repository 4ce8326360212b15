//! File exporter.
//!
//! Writes an article to `<output_dir>/<slug>-<YYYY-MM-DD>.<ext>`. A rerun
//! with the same keyword on the same day replaces the earlier file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use seowriter_shared::{ExportedFile, Result, SeoWriterError};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_-]").expect("valid non-word regex"));
static HYPHENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Slug used when a keyword has no word characters at all.
const EMPTY_SLUG: &str = "article";

/// Writes articles into one output directory.
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
}

impl FileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save `content` under today's file name for `keyword`.
    pub fn save_article(&self, keyword: &str, content: &str, extension: &str) -> Result<ExportedFile> {
        self.save_article_on(keyword, content, extension, Local::now().date_naive())
    }

    #[instrument(skip(self, content), fields(output_dir = %self.output_dir.display(), bytes = content.len()))]
    pub fn save_article_on(
        &self,
        keyword: &str,
        content: &str,
        extension: &str,
        date: NaiveDate,
    ) -> Result<ExportedFile> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| SeoWriterError::io(&self.output_dir, e))?;

        let file_name = export_file_name(keyword, date, extension);
        let target = self.output_dir.join(&file_name);
        let temp = self.output_dir.join(format!(".{file_name}.tmp"));

        std::fs::write(&temp, content).map_err(|e| SeoWriterError::io(&temp, e))?;
        if let Err(e) = std::fs::rename(&temp, &target) {
            std::fs::remove_file(&temp).ok();
            return Err(SeoWriterError::io(&target, e));
        }

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let sha256 = format!("{:x}", hasher.finalize());

        info!(path = %target.display(), size = content.len(), "article saved");

        Ok(ExportedFile {
            path: target,
            sha256,
            size_bytes: content.len(),
        })
    }

    /// Render Markdown as a standalone RTL HTML page and save it as `.html`.
    pub fn save_article_html(&self, keyword: &str, markdown: &str) -> Result<ExportedFile> {
        self.save_article_html_on(keyword, markdown, Local::now().date_naive())
    }

    pub fn save_article_html_on(
        &self,
        keyword: &str,
        markdown: &str,
        date: NaiveDate,
    ) -> Result<ExportedFile> {
        let page = html_page(keyword, markdown);
        self.save_article_on(keyword, &page, "html", date)
    }
}

/// The standalone HTML page for an article, titled with its keyword.
pub fn html_page(keyword: &str, markdown: &str) -> String {
    let page = seowriter_markdown::render_page(keyword, markdown);
    debug!(html_len = page.len(), "rendered article page");
    page
}

/// Derive a filesystem-safe slug from free text.
///
/// Letters of any script, digits and underscores survive; whitespace runs
/// become single hyphens and everything else is dropped.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(lowered.trim(), "-");
    let stripped = NON_WORD_RE.replace_all(&hyphenated, "");
    let collapsed = HYPHENS_RE.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// `<slug>-<YYYY-MM-DD>.<ext>`.
pub fn export_file_name(keyword: &str, date: NaiveDate, extension: &str) -> String {
    let slug = slugify(keyword);
    let slug = if slug.is_empty() { EMPTY_SLUG } else { slug.as_str() };
    format!("{slug}-{}.{extension}", date.format("%Y-%m-%d"))
}
