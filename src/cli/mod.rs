//! Command-line interface components
//!
//! This module contains CLI-specific code for the Topic Fetcher application,
//! including argument parsing, command handlers and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, FetchArgs, GlobalArgs, ImageArgs, ListArgs, ShowArgs,
};
pub use commands::{handle_config, handle_fetch, handle_image, handle_list, handle_show};
pub use progress::ImageProgress;
