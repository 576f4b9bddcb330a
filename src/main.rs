// src/main.rs
use affmerge_lib::models::matching::MatchTier;
use affmerge_lib::pipeline::run_merge;
use affmerge_lib::utils::config::MergeConfig;
use affmerge_lib::utils::constants::DEFAULT_MERGE_CONFIG_PATH;
use affmerge_lib::utils::env::load_env;
use affmerge_lib::utils::progress_bars::progress_config::ProgressConfig;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Merges submission-system affiliations into the paper search-system export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the merge configuration (JSON)
    #[arg(long, env = "MERGE_CONFIG", default_value = DEFAULT_MERGE_CONFIG_PATH)]
    config: PathBuf,

    /// Leave the output in volume_author key order instead of sorting it by id
    #[arg(long)]
    no_sort: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    load_env();
    let args = Args::parse();

    info!("Starting affiliation merge");
    let mut config = MergeConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    if args.no_sort {
        config.sort_output = false;
    }
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );

    let stats = run_merge(&config, &progress_config)?;

    info!("📅 Run ID: {} ({})", stats.run_id, stats.run_timestamp);
    info!(
        "📊 {} submission papers, {} rows written to {}",
        stats.submission.papers,
        stats.rows_written,
        config.output.display()
    );
    let not_matched = stats.matching.count(MatchTier::NotMatched);
    info!(
        "✅ {} of {} search papers linked to a submission paper ({} full matches), ❌ {} not matched",
        stats.matching.total() - not_matched,
        stats.matching.total(),
        stats.matching.count(MatchTier::FullMatch),
        not_matched
    );
    info!("⏱️  Total processing time: {:.2}s", stats.total_processing_time());
    Ok(())
}
