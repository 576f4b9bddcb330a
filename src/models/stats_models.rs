// src/models/stats_models.rs
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::models::language::Language;
use crate::models::matching::{MatchDecision, MatchNote, MatchTier};

/// Counters collected while aggregating submission rows. Diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionStats {
    pub rows: usize,
    pub papers: usize,
    pub empty_authors_ja: usize,
    pub empty_authors_en: usize,
    /// Papers whose raw volume string did not yield a volume key.
    pub unparsed_volumes: usize,
    /// Non-first-author rows seen before any first-author row.
    pub orphan_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub rows_by_language: BTreeMap<Language, usize>,
    pub duplicate_ids: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub tier_counts: BTreeMap<MatchTier, usize>,
    pub keys_processed: usize,
    pub dual_language_rows: usize,
    pub single_language_rows: usize,
    pub unpaired: usize,
}

impl MatchStats {
    pub fn from_decisions(decisions: &[MatchDecision]) -> Self {
        let mut stats = Self::default();
        let mut last_key: Option<&str> = None;
        for decision in decisions {
            if last_key != Some(decision.key.as_str()) {
                stats.keys_processed += 1;
                last_key = Some(decision.key.as_str());
            }
            *stats.tier_counts.entry(decision.tier).or_insert(0) += 1;
            if decision.is_dual_language() {
                stats.dual_language_rows += 1;
            } else {
                stats.single_language_rows += 1;
            }
            if decision.note == MatchNote::Unpaired {
                stats.unpaired += 1;
            }
        }
        stats
    }

    pub fn count(&self, tier: MatchTier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.tier_counts.values().sum()
    }
}

/// Summary of one merge run.
#[derive(Debug, Clone)]
pub struct MergeStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub submission: SubmissionStats,
    pub search: SearchStats,
    pub matching: MatchStats,
    pub rows_written: usize,
    pub parse_time: f64,
    pub matching_time: f64,
    pub output_time: f64,
}

impl MergeStats {
    pub fn new(run_id: String, run_timestamp: NaiveDateTime) -> Self {
        Self {
            run_id,
            run_timestamp,
            submission: SubmissionStats::default(),
            search: SearchStats::default(),
            matching: MatchStats::default(),
            rows_written: 0,
            parse_time: 0.0,
            matching_time: 0.0,
            output_time: 0.0,
        }
    }

    pub fn total_processing_time(&self) -> f64 {
        self.parse_time + self.matching_time + self.output_time
    }
}
