//! Progress display for bulk image downloads

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::Image;
use crate::errors::{AppError, Result};

/// Progress bar counting finished image requests
#[derive(Debug, Clone)]
pub struct ImageProgress {
    bar: ProgressBar,
}

impl ImageProgress {
    /// Create a bar for `total` requests, hidden in quiet mode
    pub fn new(total: usize, quiet: bool) -> Result<Self> {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| AppError::generic(format!("Progress bar template error: {}", e)))?
                .progress_chars("##-"),
        );
        bar.set_message("Fetching images");

        Ok(Self { bar })
    }

    /// Record one finished request
    pub fn record(&self, image: &Image) {
        if image.is_placeholder() {
            self.bar.set_message(format!("last: {}", image));
        }
        self.bar.inc(1);
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
