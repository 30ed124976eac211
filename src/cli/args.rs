//! Command-line argument parsing for Topic Fetcher
//!
//! This module defines the CLI structure using clap derive macros: fetching
//! the topic document, listing and inspecting topics, downloading images and
//! managing the configuration file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Topic Fetcher - browse a topic list with images
#[derive(Parser, Debug)]
#[command(
    name = "topic_fetcher",
    version,
    about = "Fetch a topic list and its images with caching and bounded concurrency",
    long_about = "Fetches a JSON topic document from a configured endpoint, deduplicates its entries
and downloads each entry's image through a bounded queue, caching results in memory."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the topic document and report its size
    Fetch(FetchArgs),

    /// List topics by name and description
    List(ListArgs),

    /// Show one topic in detail
    Show(ShowArgs),

    /// Fetch a single image by relative path
    Image(ImageArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Bypass the payload cache
    #[arg(short, long)]
    pub reload: bool,
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Bypass the payload cache
    #[arg(short, long)]
    pub reload: bool,

    /// Also download every topic's image
    #[arg(short, long)]
    pub images: bool,

    /// Maximum number of topics to list
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the show command
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Position in the list, starting at 1
    #[arg(value_name = "INDEX")]
    pub index: usize,

    /// Bypass the payload cache
    #[arg(short, long)]
    pub reload: bool,
}

/// Arguments for the image command
#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Image path relative to the configured base host
    #[arg(value_name = "PATH")]
    pub path: String,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the resolved configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested by flags, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl ShowArgs {
    /// Validate the index
    pub fn validate(&self) -> Result<(), String> {
        if self.index == 0 {
            return Err("Topic index starts at 1".to_string());
        }
        Ok(())
    }
}
