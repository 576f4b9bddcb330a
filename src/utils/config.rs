// src/utils/config.rs
//! JSON run configuration for both binaries.
//!
//! Relative paths are resolved against `base_dir`, which itself defaults to
//! the directory holding the configuration file.

use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Language;
use crate::utils::constants::{DEFAULT_ACCESS_LOG_HEADER_LINES, DEFAULT_HEADER_LINES};

fn default_primary_language() -> Language {
    Language::Ja
}

fn default_header_lines() -> usize {
    DEFAULT_HEADER_LINES
}

fn default_access_log_header_lines() -> usize {
    DEFAULT_ACCESS_LOG_HEADER_LINES
}

fn default_true() -> bool {
    true
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Malformed configuration file {}", path.display()))
}

/// Root for relative paths: `base_dir` if given (itself relative to the
/// config file), else the config file's directory.
fn resolve_root(config_path: &Path, base_dir: Option<&Path>) -> PathBuf {
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new(""));
    match base_dir {
        Some(base) => config_dir.join(base),
        None => config_dir.to_path_buf(),
    }
}

fn ensure_file(label: &str, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("{} file not found: {}", label, path.display());
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    pub submission: PathBuf,
    /// Search-system export per language.
    pub search: BTreeMap<Language, PathBuf>,
    pub output: PathBuf,
    #[serde(default = "default_primary_language")]
    pub primary_language: Language,
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
    #[serde(default)]
    pub include_admin_columns: bool,
    #[serde(default = "default_true")]
    pub sort_output: bool,
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

impl MergeConfig {
    /// Reads the file and resolves every relative path in it.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = read_json(path)?;
        let root = resolve_root(path, config.base_dir.as_deref());
        config.submission = root.join(&config.submission);
        config.output = root.join(&config.output);
        for file in config.search.values_mut() {
            *file = root.join(&*file);
        }
        Ok(config)
    }

    /// The other language, when its search export is configured.
    pub fn secondary_language(&self) -> Option<Language> {
        let other = self.primary_language.other();
        self.search.contains_key(&other).then_some(other)
    }

    /// Fails before any processing when an input is missing.
    pub fn validate_inputs(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            bail!("No output path configured");
        }
        if !self.search.contains_key(&self.primary_language) {
            bail!(
                "No search-system file configured for primary language '{}'",
                self.primary_language
            );
        }
        ensure_file("Submission-system", &self.submission)?;
        for (language, path) in &self.search {
            ensure_file(&format!("Search-system ({})", language), path)?;
        }
        Ok(())
    }

    pub fn log_config(&self) {
        info!("⚙️  Merge configuration:");
        info!("   Submission system: {}", self.submission.display());
        for (language, path) in &self.search {
            info!("   Search system ({}): {}", language, path.display());
        }
        info!("   Output: {}", self.output.display());
        info!(
            "   Primary language: {}, secondary: {}",
            self.primary_language,
            self.secondary_language()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        info!(
            "   Header lines: {}, admin columns: {}, sort output: {}",
            self.header_lines, self.include_admin_columns, self.sort_output
        );
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadsConfig {
    pub log: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_access_log_header_lines")]
    pub header_lines: usize,
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

impl DownloadsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = read_json(path)?;
        let root = resolve_root(path, config.base_dir.as_deref());
        config.log = root.join(&config.log);
        config.output = root.join(&config.output);
        Ok(config)
    }

    pub fn validate_inputs(&self) -> Result<()> {
        ensure_file("Access log", &self.log)
    }

    pub fn log_config(&self) {
        info!("⚙️  Download count configuration:");
        info!("   Access log: {}", self.log.display());
        info!("   Output: {}", self.output.display());
        info!("   Header lines: {}", self.header_lines);
    }
}
