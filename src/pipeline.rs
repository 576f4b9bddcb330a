// src/pipeline.rs - One merge run, from configuration to sorted output file
use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::time::Instant;
use uuid::Uuid;

use crate::matching::diagnostics::duplicate_reports;
use crate::matching::{Matcher, SearchIndexer, SubmissionAggregator};
use crate::models::stats_models::{MatchStats, MergeStats};
use crate::output::{sort_file_by_column, write_rows, RowFormatter};
use crate::utils::config::MergeConfig;
use crate::utils::constants::ID_SORT_COLUMN;
use crate::utils::progress_bars::logging::{MergeLogger, RunStage};
use crate::utils::progress_bars::progress_config::ProgressConfig;

pub fn run_merge(config: &MergeConfig, progress: &ProgressConfig) -> Result<MergeStats> {
    let logger = MergeLogger::new(RunStage::Merge);
    let mut stats = MergeStats::new(Uuid::new_v4().to_string(), Utc::now().naive_utc());
    logger.log_start(&stats.run_id, "affiliation merge");

    config.validate_inputs()?;

    // Phase 1: parse both systems
    let parse_start = Instant::now();
    logger.log_phase("Parsing submission system", Some(&config.submission.display().to_string()));
    let mut aggregator = SubmissionAggregator::new();
    aggregator
        .parse_file(&config.submission, config.header_lines)
        .context("Failed to parse submission-system export")?;
    let submission = aggregator
        .into_index()
        .context("Submission-system index was not built")?;
    logger.log_data_loaded(submission.stats.papers, "submission papers");
    logger.log_data_quality_issue("author rows before any first author", submission.stats.orphan_rows);

    logger.log_phase("Parsing search system", None);
    let mut indexer = SearchIndexer::new();
    indexer
        .parse_files(&config.search, config.header_lines)
        .context("Failed to parse search-system exports")?;
    let search = indexer
        .into_index()
        .context("Search-system index was not built")?;
    for (language, rows) in &search.stats.rows_by_language {
        logger.log_data_loaded(*rows, &format!("search papers ({})", language));
    }
    logger.log_data_quality_issue("repeated search ids", search.stats.duplicate_ids);
    stats.submission = submission.stats.clone();
    stats.search = search.stats.clone();
    stats.parse_time = parse_start.elapsed().as_secs_f64();

    if progress.should_show_detailed() {
        for report in duplicate_reports(&submission, &search) {
            report.log();
        }
    }

    // Phase 2: match
    let matching_start = Instant::now();
    let matcher = Matcher::new(&submission, &search, config.primary_language)?;
    logger.log_phase(
        "Matching",
        Some(&format!(
            "primary {}, secondary {}",
            matcher.primary(),
            matcher
                .secondary()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "none".to_string())
        )),
    );
    let pb = progress.create_progress_bar(matcher.key_count() as u64, "🔗", "Matching volume_author keys...");
    let decisions = matcher.run_with_progress(pb.as_ref());
    if let Some(pb) = &pb {
        pb.finish_with_message(format!("{} decisions", decisions.len()));
    }
    stats.matching = MatchStats::from_decisions(&decisions);
    stats.matching_time = matching_start.elapsed().as_secs_f64();
    logger.log_tier_distribution(&stats.matching);
    if stats.matching.unpaired > 0 {
        logger.log_warning(&format!(
            "{} search papers had no submission candidate left to pair with",
            stats.matching.unpaired
        ));
    }

    // Phase 3: write and sort
    let output_start = Instant::now();
    logger.log_phase("Writing output", Some(&config.output.display().to_string()));
    let formatter = RowFormatter::new(config.include_admin_columns);
    stats.rows_written = write_rows(&config.output, decisions.iter().map(|d| formatter.columns(d)))
        .context("Failed to write merged output")?;
    if config.sort_output {
        logger.log_phase("Sorting output by id", None);
        sort_file_by_column(&config.output, ID_SORT_COLUMN).context("Failed to sort merged output")?;
    } else {
        info!("Output left in volume_author key order (sorting disabled)");
    }
    stats.output_time = output_start.elapsed().as_secs_f64();

    logger.log_completion(&stats);
    Ok(stats)
}
