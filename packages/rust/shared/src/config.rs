//! Application configuration for the SEO writer.
//!
//! User config lives at `~/.seowriter/seowriter.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeoWriterError};
use crate::types::OutputFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "seowriter.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".seowriter";

/// Sentinel `[writer] language` value selecting [`LanguagePolicy::MatchPlan`].
pub const MATCH_PLAN_LANGUAGE: &str = "match-plan";

// ---------------------------------------------------------------------------
// Config structs (matching seowriter.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Web research settings.
    #[serde(default)]
    pub research: ResearchConfig,

    /// AI backend settings.
    #[serde(default)]
    pub ai: AiConfig,

    /// Article writer settings.
    #[serde(default)]
    pub writer: WriterConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory articles are exported to (created if missing).
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum number of words accepted in a keyword.
    #[serde(default = "default_max_keyword_words")]
    pub max_keyword_words: usize,

    /// Which file(s) to export.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_keyword_words: default_max_keyword_words(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_max_keyword_words() -> usize {
    6
}

/// `[research]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum number of search results collected per run.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// DuckDuckGo region code (`wt-wt` is "no region").
    #[serde(default = "default_region")]
    pub region: String,

    /// HTTP timeout for the search request.
    #[serde(default = "default_research_timeout")]
    pub timeout_secs: u64,

    /// Search endpoint (the DuckDuckGo HTML interface).
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            region: default_region(),
            timeout_secs: default_research_timeout(),
            endpoint: default_search_endpoint(),
        }
    }
}

fn default_max_results() -> usize {
    5
}
fn default_region() -> String {
    "wt-wt".into()
}
fn default_research_timeout() -> u64 {
    15
}
fn default_search_endpoint() -> String {
    "https://html.duckduckgo.com/html/".into()
}

/// `[ai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Backend name. Only `gemini` exists today.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model identifier passed to the backend.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    /// HTTP timeout for a single generation call.
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_ai_endpoint(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

impl AiConfig {
    /// Read the API key from the configured env var. Empty values count as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_ai_timeout() -> u64 {
    120
}

/// `[writer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Target language of the article, or `match-plan`.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

impl WriterConfig {
    /// Resolve the configured language string into a policy.
    pub fn language_policy(&self) -> LanguagePolicy {
        let lang = self.language.trim();
        if lang.is_empty() || lang.eq_ignore_ascii_case(MATCH_PLAN_LANGUAGE) {
            LanguagePolicy::MatchPlan
        } else {
            LanguagePolicy::Fixed(lang.to_string())
        }
    }
}

fn default_language() -> String {
    "Arabic".into()
}

/// How the writer chooses the article's natural language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguagePolicy {
    /// Always write in this language, whatever script the keyword uses.
    Fixed(String),
    /// Write in the language the content plan is written in.
    MatchPlan,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.seowriter/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SeoWriterError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.seowriter/seowriter.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SeoWriterError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SeoWriterError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SeoWriterError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SeoWriterError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SeoWriterError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the AI API key env var is set and non-empty.
pub fn validate_api_key(config: &AiConfig) -> Result<()> {
    require_api_key(config).map(|_| ())
}

/// Read the AI API key, failing with a config error that names the env var.
pub fn require_api_key(config: &AiConfig) -> Result<String> {
    config.api_key().ok_or_else(|| {
        SeoWriterError::config(format!(
            "{} API key is missing. Set the {} environment variable (or add it to .env).",
            config.provider, config.api_key_env
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("max_keyword_words"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.max_keyword_words, 6);
        assert_eq!(parsed.defaults.output_dir, "output");
        assert_eq!(parsed.research.max_results, 5);
        assert_eq!(parsed.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(parsed.defaults.format, OutputFormat::Markdown);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
max_keyword_words = 4
format = "both"

[writer]
language = "English"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.max_keyword_words, 4);
        assert_eq!(config.defaults.output_dir, "output");
        assert_eq!(config.defaults.format, OutputFormat::Both);
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert_eq!(
            config.writer.language_policy(),
            LanguagePolicy::Fixed("English".into())
        );
    }

    #[test]
    fn language_policy_defaults_to_arabic() {
        let writer = WriterConfig::default();
        assert_eq!(
            writer.language_policy(),
            LanguagePolicy::Fixed("Arabic".into())
        );
    }

    #[test]
    fn language_policy_match_plan() {
        let writer = WriterConfig {
            language: "Match-Plan".into(),
        };
        assert_eq!(writer.language_policy(), LanguagePolicy::MatchPlan);
    }

    #[test]
    fn load_config_from_reports_bad_toml() {
        let path = std::env::temp_dir().join(format!(
            "seowriter-bad-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[defaults\nmax_keyword_words = ").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn api_key_validation() {
        // Use a unique env var name to avoid interfering with other tests
        let config = AiConfig {
            api_key_env: "SEOWRITER_TEST_NONEXISTENT_KEY_12345".into(),
            ..AiConfig::default()
        };
        assert!(config.api_key().is_none());
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key is missing"));

        let err = require_api_key(&config).unwrap_err();
        assert!(err.to_string().contains("SEOWRITER_TEST_NONEXISTENT_KEY_12345"));
    }
}
