use anyhow::Result;
use critiq::{cli, run};

#[tokio::main]
async fn main() {
    if let Err(e) = run_main().await {
        display_error(&e);
        std::process::exit(1);
    }
}

/// Display an error with its full cause chain.
fn display_error(error: &anyhow::Error) {
    eprintln!("\n\u{26a0} Error: {}", error);

    let causes: Vec<_> = error.chain().skip(1).collect();
    if !causes.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            let prefix = if i == causes.len() - 1 {
                "\u{2514}\u{2500}"
            } else {
                "\u{251c}\u{2500}"
            };
            eprintln!("{} {}", prefix, cause);
        }
    }
}

async fn run_main() -> Result<()> {
    // Parse CLI arguments (includes env vars)
    let args = cli::args::parse();

    // Load config from files + env vars (already merged)
    let config = cli::config::load(&args)?;

    // Merge configurations: CLI args override config files
    let review_config = cli::config::merge_config(&args, config);

    // Initialize logging based on verbosity
    critiq::init_logging(review_config.verbose, review_config.quiet);

    // Run the pipeline
    run(review_config).await
}
