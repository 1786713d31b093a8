//! # critiq Review Pipeline
//!
//! critiq prepares a repository for LLM code review and submits it in
//! token-budgeted batches:
//!
//! 1. **Scanning** - Walk the repository, applying ignore patterns
//! 2. **Planning** - Partition file contents into ordered batches that fit
//!    the model's prompt budget
//! 3. **Reviewing** - Submit each batch to the configured provider with a
//!    structured-findings tool
//! 4. **Reporting** - Merge findings across batches and render them
//!
//! The `ReviewConfig` struct is the final resolved configuration from all
//! sources. Configuration follows hierarchical precedence:
//! 1. User config (~/.config/critiq/config.toml)
//! 2. Git root (critiq.toml)
//! 3. Current directory (critiq.toml)
//! 4. Explicit --config path
//! 5. Environment variables (CRITIQ_*)
//! 6. CLI flags (highest precedence)
//!
//! Scanning and planning compose purely by data passing: the scanner's
//! output is the planner's input, so both are testable without a provider.

pub mod cli;
pub mod llm;
pub mod review;
pub mod scanner;
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::llm::planner::Batch;
use crate::llm::tokenizer::{TiktokenTokenizer, Tokenizer};
use crate::utils::error::CritiqError;

/// Final resolved configuration after merging all sources (CLI, env, config files).
/// This struct represents the single source of truth for all configuration values
/// used throughout the pipeline execution.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Review criteria the model is asked to check (at least one)
    pub criteria: Vec<String>,
    /// Repository path to review
    pub path: PathBuf,
    /// Ignore-pattern file (optional; conventional and user-level files are
    /// used when absent)
    pub ignore_file: Option<PathBuf>,
    /// Additional-context file (optional)
    pub context_file: Option<PathBuf>,
    /// LLM provider (e.g., "anthropic", "openai")
    pub provider: String,
    /// Model name (optional, provider has a default)
    pub model: Option<String>,
    /// Prompt token budget per batch (optional, derived from the model's
    /// context window)
    pub budget: Option<usize>,
    /// Show the planned batches without calling the LLM
    pub dry_run: bool,
    /// Verbosity level (0-3)
    pub verbose: u8,
    /// Quiet mode (suppress all non-error output)
    pub quiet: bool,
}

/// Initialize logging based on verbosity level.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

pub async fn run(config: ReviewConfig) -> Result<()> {
    tracing::info!("critiq v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: provider={}, model={:?}, path={}, budget={:?}",
        config.provider,
        config.model,
        config.path.display(),
        config.budget
    );

    // Validate repository path exists
    if !config.path.exists() {
        return Err(anyhow::anyhow!(
            "Repository path does not exist: {}",
            config.path.display()
        ))
        .context("Failed to validate repository path");
    }

    if config.criteria.is_empty() {
        return Err(CritiqError::ValidationError {
            message: "No review criteria given".to_string(),
            suggestion: "Pass at least one criterion, e.g. `critiq \"error handling\"`"
                .to_string(),
        }
        .into());
    }

    // The context file is explicit configuration; unlike the ignore file,
    // an unreadable one is a hard error.
    let context = match &config.context_file {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read context file {}", path.display()))?,
        ),
        None => None,
    };

    let rules = scanner::IgnoreRules::resolve(&config.path, config.ignore_file.as_deref()).await;
    tracing::debug!("Loaded {} ignore patterns", rules.len());

    let files = scanner::scan_repository(&config.path, &rules)
        .await
        .context("Failed to scan repository")?;
    if files.is_empty() {
        tracing::warn!(
            "No reviewable files found under {}",
            config.path.display()
        );
    }

    let model = match &config.model {
        Some(model) => model.clone(),
        None => llm::providers::default_model(&config.provider)?.to_string(),
    };
    let tokenizer = TiktokenTokenizer::from_model_name(&model)?;

    let base_prompt = review::prompt::build_base_prompt(&config.criteria, context.as_deref());
    let overhead = tokenizer.count_tokens(&base_prompt);
    let budget = match config.budget {
        Some(budget) => budget,
        None => llm::prompt_budget(llm::providers::context_window(&config.provider, &model)?),
    };

    let batches = llm::plan_batches(files, overhead, budget, |file| {
        tokenizer.count_tokens(&review::prompt::file_block(file))
    })?;
    tracing::info!(
        "Planned {} batches (budget {}, overhead {})",
        batches.len(),
        budget,
        overhead
    );

    if config.dry_run {
        display_plan(&batches, overhead, budget);
        return Ok(());
    }

    let provider = llm::providers::create_provider(&config.provider, Some(&model))?;
    let outcome = review::review_batches(provider.as_ref(), &base_prompt, &batches).await;
    if outcome.failed_batches > 0 {
        tracing::warn!(
            "{} of {} batches failed and were skipped",
            outcome.failed_batches,
            batches.len()
        );
    }

    print!("{}", review::report::render(&outcome.report));
    Ok(())
}

/// Display the planned batches for dry-run mode.
fn display_plan(batches: &[Batch], overhead: usize, budget: usize) {
    println!("Dry Run Mode - Planned Batches");
    println!("==============================");
    println!("Budget:   {} tokens per batch ({} overhead)", budget, overhead);
    println!("Batches:  {}", batches.len());
    for (index, batch) in batches.iter().enumerate() {
        let marker = if batch.is_over_budget(budget) {
            " (over budget)"
        } else {
            ""
        };
        println!(
            "  {}: {} files, {} tokens{}",
            index + 1,
            batch.files.len(),
            batch.token_count,
            marker
        );
    }
    println!();
    println!("No LLM calls will be made.");
}
