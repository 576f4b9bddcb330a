// src/utils/progress_bars/progress_config.rs

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::env;

const BAR_TEMPLATE: &str = "  {prefix} [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {msg}";

/// Configuration for progress tracking throughout a run
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show progress bars at all
    pub enabled: bool,
    /// Whether to print per-index diagnostics and the per-tier breakdown
    pub detailed: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("PROGRESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            detailed: env::var("PROGRESS_DETAILED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        }
    }

    /// Check if detailed progress should be shown
    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    /// A bar of `len` steps, or `None` when progress is disabled.
    pub fn create_progress_bar(&self, len: u64, prefix: &str, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }
        let pb = ProgressBar::new(len);
        match ProgressStyle::with_template(BAR_TEMPLATE) {
            Ok(style) => pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  ")),
            Err(e) => warn!("Invalid progress bar template, using default style: {}", e),
        }
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.to_string());
        Some(pb)
    }
}
