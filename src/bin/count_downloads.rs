// src/bin/count_downloads.rs
//
// Counts downloads per paper from the search system's access log and writes
// one `paper_id<TAB>count` line per paper, sorted by paper id.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use affmerge_lib::downloads::{count_record, DownloadCounter};
use affmerge_lib::output::write_rows;
use affmerge_lib::utils::config::DownloadsConfig;
use affmerge_lib::utils::constants::DEFAULT_DOWNLOADS_CONFIG_PATH;
use affmerge_lib::utils::env::load_env;
use affmerge_lib::utils::progress_bars::logging::{MergeLogger, RunStage};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the download count configuration (JSON)
    #[arg(long, env = "DOWNLOADS_CONFIG", default_value = DEFAULT_DOWNLOADS_CONFIG_PATH)]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    load_env();
    let args = Args::parse();

    let config = DownloadsConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    config.log_config();
    config.validate_inputs()?;

    let logger = MergeLogger::new(RunStage::Downloads);
    logger.log_phase("Parsing access log", Some(&config.log.display().to_string()));
    let mut counter = DownloadCounter::new();
    counter
        .parse_file(&config.log, config.header_lines)
        .context("Failed to parse access log")?;
    let index = counter.index().context("Access log index was not built")?;

    let downloads = index.download_counts();
    let logins = index.login_counts();
    logger.log_data_loaded(downloads.len(), "downloaded papers");
    info!(
        "🔑 {} logins by {} users",
        logins.iter().map(|(_, count)| count).sum::<usize>(),
        logins.len()
    );

    logger.log_phase("Writing counts", Some(&config.output.display().to_string()));
    let written = write_rows(
        &config.output,
        downloads
            .iter()
            .map(|(paper, count)| count_record(paper, *count)),
    )
    .context("Failed to write download counts")?;
    info!(
        "🎉 [{}] Wrote {} paper counts in {:.2?}",
        logger.get_stage_name(),
        written,
        logger.get_elapsed()
    );
    Ok(())
}
