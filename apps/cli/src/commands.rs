//! CLI command definitions, routing, and tracing setup.

use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{InquireError, Text};
use tracing::{info, warn};

use seowriter_core::keyword::validate_keyword;
use seowriter_core::pipeline::{
    GenerateConfig, GenerateResult, ProgressReporter, StageReport, generate_article,
};
use seowriter_research::ResearchCollector;
use seowriter_shared::{
    AppConfig, ErrorKind, OutputFormat, SeoWriterError, init_config, load_config,
    validate_api_key,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SEO Writer: research a keyword and write a long-form article about it.
#[derive(Parser)]
#[command(
    name = "seowriter",
    version,
    about = "Research a keyword on the web and write an SEO article about it with AI.",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
pub(crate) struct Cli {
    /// Target keyword (prompted for when omitted).
    #[arg(value_name = "KEYWORD")]
    pub keyword: Vec<String>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Per-run overrides of the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct Overrides {
    /// Output directory for article files.
    #[arg(short, long)]
    pub out: Option<String>,

    /// Which files to write.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Maximum number of words allowed in the keyword.
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Article language, or `match-plan` to follow the plan's language.
    #[arg(long)]
    pub language: Option<String>,
}

impl Overrides {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(out) = &self.out {
            config.defaults.output_dir.clone_from(out);
        }
        if let Some(format) = self.format {
            config.defaults.format = format.into();
        }
        if let Some(max_words) = self.max_words {
            config.defaults.max_keyword_words = max_words;
        }
        if let Some(language) = &self.language {
            config.writer.language.clone_from(language);
        }
    }
}

/// Export format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum FormatArg {
    Md,
    Html,
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Md => Self::Markdown,
            FormatArg::Html => Self::Html,
            FormatArg::Both => Self::Both,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Subcommands. Without one, the CLI generates an article.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "seowriter=info",
        1 => "seowriter=debug",
        _ => "seowriter=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Command::Config { action }) => {
            match action {
                ConfigAction::Init => cmd_config_init()?,
                ConfigAction::Show => cmd_config_show(&cli.overrides)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        None => cmd_generate(&cli.keyword, &cli.overrides).await,
    }
}

fn print_banner() {
    println!();
    println!(
        "  {} {}",
        "SEO Writer".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dark_grey()
    );
    println!("  {}", "AI-assisted SEO article generator".dark_grey());
    println!();
}

async fn cmd_generate(keyword: &[String], overrides: &Overrides) -> Result<ExitCode> {
    print_banner();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => return Ok(report_failure(&e)),
    };
    overrides.apply(&mut config);

    // Warn early, fail later: a bad keyword should be reported first.
    if let Err(e) = validate_api_key(&config.ai) {
        warn!(env = %config.ai.api_key_env, "AI API key not set");
        println!("  {} {e}", "Warning:".yellow().bold());
        println!();
    }

    let raw_keyword = if keyword.is_empty() {
        match prompt_keyword() {
            Ok(keyword) => keyword,
            Err(e) => return Ok(report_failure(&e)),
        }
    } else {
        keyword.join(" ")
    };

    info!(keyword = %raw_keyword, format = ?config.defaults.format, "generating article");

    let reporter = CliProgress::new();
    match generate(&raw_keyword, &config, &reporter).await {
        Ok(result) => {
            print_success(&result);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            reporter.abandon();
            Ok(report_failure(&e))
        }
    }
}

async fn generate(
    raw_keyword: &str,
    config: &AppConfig,
    reporter: &dyn ProgressReporter,
) -> Result<GenerateResult, SeoWriterError> {
    // Input errors outrank anything that can go wrong while setting up clients.
    validate_keyword(raw_keyword, config.defaults.max_keyword_words)?;

    let research = ResearchCollector::from_config(&config.research)?;
    let generate_config = GenerateConfig::from(config);

    generate_article(
        raw_keyword,
        &generate_config,
        &research,
        || seowriter_provider::from_config(&config.ai),
        reporter,
    )
    .await
}

/// The label a failed run is reported under.
fn failure_label(err: &SeoWriterError) -> &'static str {
    match err.kind() {
        ErrorKind::Validation => "Validation Error:",
        ErrorKind::System => "System Error:",
    }
}

fn report_failure(err: &SeoWriterError) -> ExitCode {
    println!();
    println!("  {} {err}", failure_label(err).red().bold());
    println!();
    ExitCode::FAILURE
}

/// Ask for the keyword interactively, or read one line of stdin when it is
/// not a terminal (`echo "coffee" | seowriter`).
fn prompt_keyword() -> Result<String, SeoWriterError> {
    match Text::new("Enter your target keyword:")
        .with_help_message("e.g. best coffee machines")
        .prompt()
    {
        Ok(keyword) => Ok(keyword),
        // Cancelling the prompt is the same as entering nothing.
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(String::new())
        }
        Err(InquireError::NotTTY) => read_keyword_line(std::io::stdin().lock()),
        Err(InquireError::IO(e)) => Err(SeoWriterError::io("<stdin>", e)),
        Err(e) => Err(SeoWriterError::config(format!("failed to read keyword: {e}"))),
    }
}

fn read_keyword_line(mut reader: impl BufRead) -> Result<String, SeoWriterError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| SeoWriterError::io("<stdin>", e))?;
    Ok(line)
}

fn print_success(result: &GenerateResult) {
    println!();
    println!("  {}", "Article saved successfully!".green().bold());
    println!("  Title:   {}", result.plan.value().main_topic);
    for file in &result.files {
        println!("  File:    {}", file.path.display());
    }
    println!("  Words:   ~{}", result.word_count);
    println!("  Sources: {}", result.source_count);
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("valid spinner template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn abandon(&self) {
        self.spinner.finish_and_clear();
    }

    fn check(&self, line: String) {
        self.spinner.println(format!("  {} {line}", "✓".green()));
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(format!("{name}..."));
    }

    fn stage_done(&self, report: StageReport<'_>) {
        match report {
            StageReport::Researched { sources } => {
                self.check(format!("Found {sources} sources."));
            }
            StageReport::Planned {
                main_topic,
                fallback,
            } => {
                self.check(format!("Plan created: {main_topic}"));
                if fallback {
                    self.spinner.println(format!(
                        "    {}",
                        "(the AI reply could not be parsed; using a generic outline)".yellow()
                    ));
                }
            }
            StageReport::Written { words } => {
                self.check(format!("Article generated ({words} words approx)."));
            }
        }
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(overrides: &Overrides) -> Result<()> {
    let mut config: AppConfig = load_config()?;
    overrides.apply(&mut config);
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
