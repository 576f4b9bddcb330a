// src/utils/progress_bars/logging.rs - Phase logging helpers for both binaries
use log::{info, warn};
use std::time::{Duration, Instant};

use crate::models::matching::MatchTier;
use crate::models::stats_models::{MatchStats, MergeStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Merge,
    Downloads,
}

#[derive(Clone)]
pub struct MergeLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl MergeLogger {
    pub fn new(stage: RunStage) -> Self {
        let (stage_name, stage_emoji) = match stage {
            RunStage::Merge => ("MERGE", "🔗"),
            RunStage::Downloads => ("DOWNLOADS", "📥"),
        };
        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, description: &str) {
        info!(
            "[{}] {} 🚀 Starting {} (run ID: {})",
            self.stage_name, self.stage_emoji, description, run_id
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_data_loaded(&self, count: usize, data_type: &str) {
        info!(
            "[{}] {} 📊 Loaded {} {}",
            self.stage_name, self.stage_emoji, count, data_type
        );
    }

    pub fn log_data_quality_issue(&self, issue_type: &str, count: usize) {
        if count > 0 {
            warn!(
                "[{}] {} ⚠️  Data quality: {} instances of {}",
                self.stage_name, self.stage_emoji, count, issue_type
            );
        }
    }

    pub fn log_tier_distribution(&self, stats: &MatchStats) {
        let total = stats.total();
        info!(
            "[{}] {} 🎯 {} decisions over {} keys ({} dual-language, {} single-language rows)",
            self.stage_name,
            self.stage_emoji,
            total,
            stats.keys_processed,
            stats.dual_language_rows,
            stats.single_language_rows
        );
        for tier in MatchTier::ALL {
            let count = stats.count(tier);
            let percent = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            info!(
                "[{}] {}   {} {:<24} {:>7} ({:.1}%)",
                self.stage_name,
                self.stage_emoji,
                tier.emoji(),
                tier.label(),
                count,
                percent
            );
        }
    }

    pub fn log_completion(&self, stats: &MergeStats) {
        info!(
            "[{}] {} 🎉 COMPLETED: {} rows written in {:.2?}",
            self.stage_name,
            self.stage_emoji,
            stats.rows_written,
            self.get_elapsed()
        );
        info!(
            "[{}] {} ⏱️  Parse {:.2}s, matching {:.2}s, output {:.2}s",
            self.stage_name, self.stage_emoji, stats.parse_time, stats.matching_time, stats.output_time
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn get_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_stage_name(&self) -> &'static str {
        self.stage_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(MergeLogger::new(RunStage::Merge).get_stage_name(), "MERGE");
        assert_eq!(MergeLogger::new(RunStage::Downloads).get_stage_name(), "DOWNLOADS");
    }
}
