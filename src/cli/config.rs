//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** - Highest precedence (merged in `merge_config`)
//! 2. **Environment variables** - Middle precedence (via `CRITIQ_*` prefix)
//! 3. **Config files** - Lowest precedence
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/critiq/config.toml` (user config directory - lowest precedence)
//! 2. `critiq.toml` in git repository root (walking up from current directory)
//! 3. `./critiq.toml` in current directory
//! 4. Explicit `--config` path (if provided and exists - overrides all above)

use crate::ReviewConfig;
use crate::cli::args::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub review: ReviewSection,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: Option<String>,
    /// Prompt token budget per batch; derived from the model when absent
    pub budget: Option<usize>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            budget: None,
        }
    }
}

/// Review input settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSection {
    /// Ignore-pattern file path
    pub ignore_file: Option<PathBuf>,
    /// Additional-context file path
    pub context_file: Option<PathBuf>,
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn discover_config_paths(explicit_path: &PathBuf) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // User config (lowest precedence)
    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    // Git root config
    if let Some(git_root) = find_git_root() {
        let git_config = git_root.join("critiq.toml");
        if git_config.exists() {
            paths.push(git_config);
        }
    }

    // Current directory config
    let current_dir_config = PathBuf::from("critiq.toml");
    if current_dir_config.exists() {
        paths.push(current_dir_config);
    }

    // Explicit --config path (highest precedence)
    if explicit_path != &PathBuf::from("critiq.toml") && explicit_path.exists() {
        paths.push(explicit_path.clone());
    }

    paths
}

fn find_git_root() -> Option<PathBuf> {
    git2::Repository::discover(".")
        .ok()
        .and_then(|repo| repo.workdir().map(|p| p.to_path_buf()))
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("critiq").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in discover_config_paths(&args.config) {
        builder = builder.add_source(config::File::from(config_path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CRITIQ")
            .separator("_")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Merge configurations: CLI args override config files and environment.
pub fn merge_config(args: &Args, config: Config) -> ReviewConfig {
    ReviewConfig {
        criteria: args.criteria.clone(),
        path: args.path.clone(),
        ignore_file: args.ignore.clone().or(config.review.ignore_file),
        context_file: args.context.clone().or(config.review.context_file),
        provider: args
            .provider
            .clone()
            .unwrap_or(config.general.provider),
        model: args.model.clone().or(config.general.model),
        budget: args.budget.or(config.general.budget),
        dry_run: args.dry_run,
        verbose: args.verbose,
        quiet: args.quiet,
    }
}
