//! Core domain types shared across the pipeline stages.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a fail-open stage: either the real value, or a substituted
/// default together with the reason the real value could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The stage produced its value normally.
    Fresh(T),
    /// The stage failed and substituted `value`.
    Fallback { value: T, reason: String },
}

impl<T> Outcome<T> {
    /// Borrow the carried value regardless of branch.
    pub fn value(&self) -> &T {
        match self {
            Self::Fresh(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Take the carried value regardless of branch.
    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Why the fallback was taken, if it was.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

/// A single web search record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Ordered research records for one run.
///
/// The `sources`/`snippets`/`titles` views are derived from the same record
/// list, so they always have equal length and line up index-wise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    records: Vec<SearchHit>,
}

impl ResearchResult {
    pub fn new(records: Vec<SearchHit>) -> Self {
        Self { records }
    }

    /// The valid "search failed" state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result URLs, in record order.
    pub fn sources(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.url.as_str()).collect()
    }

    /// Result snippets, in record order.
    pub fn snippets(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.snippet.as_str()).collect()
    }

    /// Result titles, in record order.
    pub fn titles(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.title.as_str()).collect()
    }

    /// The raw record list.
    pub fn raw(&self) -> &[SearchHit] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All snippets joined with blank lines, as embedded in prompts.
    pub fn joined_snippets(&self) -> String {
        self.snippets().join("\n\n")
    }
}

// ---------------------------------------------------------------------------
// Content plan
// ---------------------------------------------------------------------------

/// Search intent of a plan. Parsed case-insensitively; unknown values are
/// kept verbatim rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchIntent {
    #[default]
    Informational,
    Transactional,
    Commercial,
    Navigational,
    Other(String),
}

impl From<String> for SearchIntent {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "informational" => Self::Informational,
            "transactional" => Self::Transactional,
            "commercial" => Self::Commercial,
            "navigational" => Self::Navigational,
            _ => Self::Other(s),
        }
    }
}

impl From<SearchIntent> for String {
    fn from(intent: SearchIntent) -> Self {
        intent.to_string()
    }
}

impl std::fmt::Display for SearchIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Informational => f.write_str("Informational"),
            Self::Transactional => f.write_str("Transactional"),
            Self::Commercial => f.write_str("Commercial"),
            Self::Navigational => f.write_str("Navigational"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Deserialize a field where JSON `null` means "use the default".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One H2 section of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subheadings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl OutlineSection {
    fn bare(heading: &str, notes: &str) -> Self {
        Self {
            heading: heading.into(),
            subheadings: Vec::new(),
            notes: notes.into(),
        }
    }
}

/// Structured article plan produced by the planner.
///
/// Field order is the serialization order, which the writer relies on for a
/// stable prompt rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPlan {
    pub main_topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub search_intent: SearchIntent,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_audience: String,
    pub outline: Vec<OutlineSection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secondary_keywords: Vec<String>,
}

impl ContentPlan {
    /// The deterministic plan used when the AI reply cannot be parsed.
    pub fn fallback(keyword: &str) -> Self {
        Self {
            main_topic: format!("Comprehensive Guide to {keyword}"),
            search_intent: SearchIntent::Informational,
            target_audience: String::new(),
            outline: vec![
                OutlineSection::bare("Introduction", "Introduce the topic"),
                OutlineSection::bare("Main Concepts", "Explain core concepts"),
                OutlineSection::bare("Conclusion", "Summarize"),
            ],
            secondary_keywords: vec![keyword.to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Article & export
// ---------------------------------------------------------------------------

/// Generated long-form Markdown. Opaque to everything but the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub markdown: String,
}

impl Article {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }

    /// Approximate word count (whitespace-separated tokens).
    pub fn word_count(&self) -> usize {
        self.markdown.split_whitespace().count()
    }
}

/// Which renderings of an article to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "both")]
    Both,
}

impl OutputFormat {
    pub fn wants_markdown(self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }

    pub fn wants_html(self) -> bool {
        matches!(self, Self::Html | Self::Both)
    }
}

/// A file written by the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    /// Where the file was written.
    pub path: PathBuf,
    /// SHA-256 of the written content, hex-encoded.
    pub sha256: String,
    pub size_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits() -> Vec<SearchHit> {
        vec![
            SearchHit {
                title: "First".into(),
                url: "https://a.example.com".into(),
                snippet: "alpha".into(),
            },
            SearchHit {
                title: "Second".into(),
                url: "https://b.example.com".into(),
                snippet: "beta".into(),
            },
        ]
    }

    #[test]
    fn research_views_line_up() {
        let result = ResearchResult::new(hits());
        assert_eq!(result.len(), 2);
        assert_eq!(result.sources(), vec!["https://a.example.com", "https://b.example.com"]);
        assert_eq!(result.snippets(), vec!["alpha", "beta"]);
        assert_eq!(result.titles(), vec!["First", "Second"]);
        assert_eq!(result.raw().len(), 2);
        assert_eq!(result.joined_snippets(), "alpha\n\nbeta");
    }

    #[test]
    fn empty_research_has_empty_views() {
        let result = ResearchResult::empty();
        assert!(result.is_empty());
        assert!(result.sources().is_empty());
        assert!(result.snippets().is_empty());
        assert!(result.titles().is_empty());
        assert_eq!(result.joined_snippets(), "");
    }

    #[test]
    fn search_intent_is_case_insensitive() {
        let intent: SearchIntent = serde_json::from_str(r#""COMMERCIAL""#).unwrap();
        assert_eq!(intent, SearchIntent::Commercial);

        let intent: SearchIntent = serde_json::from_str(r#""informational""#).unwrap();
        assert_eq!(intent, SearchIntent::Informational);
    }

    #[test]
    fn search_intent_keeps_unknown_values() {
        let intent: SearchIntent = serde_json::from_str(r#""Local""#).unwrap();
        assert_eq!(intent, SearchIntent::Other("Local".into()));
        assert_eq!(serde_json::to_string(&intent).unwrap(), r#""Local""#);
    }

    #[test]
    fn plan_parses_with_optional_fields_missing() {
        let json = r#"{
            "main_topic": "Coffee",
            "outline": [{"heading": "Intro"}]
        }"#;
        let plan: ContentPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.search_intent, SearchIntent::Informational);
        assert!(plan.secondary_keywords.is_empty());
        assert!(plan.outline[0].subheadings.is_empty());
    }

    #[test]
    fn plan_treats_null_fields_as_defaults() {
        let json = r#"{
            "main_topic": "Coffee",
            "search_intent": null,
            "target_audience": null,
            "outline": [{"heading": "Intro", "subheadings": null, "notes": null}],
            "secondary_keywords": null
        }"#;
        let plan: ContentPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.search_intent, SearchIntent::Informational);
        assert_eq!(plan.target_audience, "");
        assert!(plan.secondary_keywords.is_empty());
        assert!(plan.outline[0].subheadings.is_empty());
        assert_eq!(plan.outline[0].notes, "");
    }

    #[test]
    fn fallback_plan_shape() {
        let plan = ContentPlan::fallback("قهوة");
        assert_eq!(plan.main_topic, "Comprehensive Guide to قهوة");
        assert_eq!(plan.search_intent.to_string(), "Informational");
        let headings: Vec<_> = plan.outline.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Introduction", "Main Concepts", "Conclusion"]);
        assert!(plan.outline.iter().all(|s| s.subheadings.is_empty()));
        assert_eq!(plan.secondary_keywords, vec!["قهوة".to_string()]);
    }

    #[test]
    fn outcome_accessors() {
        let fresh = Outcome::Fresh(1);
        assert!(!fresh.is_fallback());
        assert_eq!(fresh.reason(), None);
        assert_eq!(*fresh.value(), 1);

        let fallback = Outcome::Fallback {
            value: 2,
            reason: "no JSON".into(),
        };
        assert!(fallback.is_fallback());
        assert_eq!(fallback.reason(), Some("no JSON"));
        assert_eq!(fallback.into_value(), 2);
    }

    #[test]
    fn article_word_count() {
        let article = Article::new("# Title\n\nOne two  three\nfour");
        assert_eq!(article.word_count(), 6);
    }

    #[test]
    fn output_format_selection() {
        assert!(OutputFormat::Markdown.wants_markdown());
        assert!(!OutputFormat::Markdown.wants_html());
        assert!(OutputFormat::Both.wants_markdown() && OutputFormat::Both.wants_html());
        assert!(OutputFormat::Html.wants_html());
    }
}
