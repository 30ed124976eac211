//! Topic Fetcher CLI application
//!
//! Command-line interface for fetching a topic list and its images with
//! in-memory caching and bounded download concurrency.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// Import CLI modules through the library (module is public but not re-exported)
use topic_fetcher::cli::{
    handle_config, handle_fetch, handle_image, handle_list, handle_show, Cli, Commands,
};
use topic_fetcher::config::{AppConfig, LoggingConfig};
use topic_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Configuration is needed for the log level, but `config` commands must
    // still work when it cannot be loaded
    let config = AppConfig::load(cli.global.config.clone()).await;
    init_logging(&cli, config.as_ref().ok().map(|c| &c.logging));

    info!("Topic Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    // Execute the appropriate command
    match cli.command {
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, cli.global.config).await
        }
        Commands::Fetch(args) => {
            info!("Executing fetch command");
            handle_fetch(args, config?).await
        }
        Commands::List(args) => {
            info!("Executing list command");
            handle_list(args, config?, cli.global.quiet).await
        }
        Commands::Show(args) => {
            info!("Executing show command");
            handle_show(args, config?).await
        }
        Commands::Image(args) => {
            info!("Executing image command");
            handle_image(args, config?).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings and configuration
fn init_logging(cli: &Cli, logging: Option<&LoggingConfig>) {
    let log_level = match cli.log_level() {
        Some(level) => level.to_string().to_lowercase(),
        None => logging
            .map(|l| l.level.clone())
            .unwrap_or_else(|| "warn".to_string()),
    };
    let colored = logging.map_or(true, |l| l.colored_output);

    // Create environment filter
    let mut filter = EnvFilter::from_default_env();
    match format!("topic_fetcher={}", log_level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", log_level, e),
    }

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(colored)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
