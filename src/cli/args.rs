use clap::Parser;
use std::path::PathBuf;

/// CLI argument parsing with environment variable support.
///
/// Environment variables follow the pattern `CRITIQ_*` and are overridden by CLI flags.
/// Example: `CRITIQ_PROVIDER=openai` is overridden by `--provider anthropic`.
#[derive(Parser, Debug)]
#[command(name = "critiq")]
#[command(about = "Criteria-driven LLM code review for whole repositories")]
#[command(version)]
pub struct Args {
    /// Review criteria, e.g. "error handling" (at least one required)
    #[arg(required = true)]
    pub criteria: Vec<String>,

    /// Path to the repository to review
    #[arg(long, default_value = ".", env = "CRITIQ_PATH")]
    pub path: PathBuf,

    /// Ignore-pattern file (defaults to .critiqignore at the repository root)
    #[arg(long, env = "CRITIQ_IGNORE")]
    pub ignore: Option<PathBuf>,

    /// File with additional context to consider during review
    #[arg(long, env = "CRITIQ_CONTEXT")]
    pub context: Option<PathBuf>,

    /// LLM provider
    #[arg(short, long, env = "CRITIQ_PROVIDER")]
    pub provider: Option<String>,

    /// Model to use
    #[arg(short, long, env = "CRITIQ_MODEL")]
    pub model: Option<String>,

    /// Prompt token budget per batch (default: 70% of the model's context window)
    #[arg(long, env = "CRITIQ_BUDGET")]
    pub budget: Option<usize>,

    /// Config file path
    #[arg(short, long, default_value = "critiq.toml", env = "CRITIQ_CONFIG")]
    pub config: PathBuf,

    /// Show the planned batches without calling the LLM
    #[arg(long, env = "CRITIQ_DRY_RUN")]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
