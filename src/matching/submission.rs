// src/matching/submission.rs
//! Groups per-author submission rows into papers and indexes them.
//!
//! The export holds one row per author, papers grouped contiguously and each
//! group opened by its first-author row (ordinal `"1"`). Aggregation is a
//! fold over the rows: a first-author row flushes the open paper and starts
//! a new one, every row contributes one author.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::input::read_tsv;
use crate::matching::keys::submission_volume_no;
use crate::models::papers::{AuthorList, SubmissionPaper};
use crate::models::records::{SubmissionId, SubmissionRow};
use crate::models::stats_models::SubmissionStats;
use crate::models::Language;
use crate::utils::multi_map::MultiMap;

/// The paper currently being accumulated.
struct PaperAccumulator {
    title_ja: String,
    title_en: String,
    volume_no: Option<String>,
    record: Arc<SubmissionRow>,
    authors_ja: AuthorList,
    authors_en: AuthorList,
}

impl PaperAccumulator {
    fn open(row: &Arc<SubmissionRow>) -> Self {
        Self {
            title_ja: row.title_ja.clone(),
            title_en: row.title_en.clone(),
            volume_no: submission_volume_no(&row.volume_raw),
            record: Arc::clone(row),
            authors_ja: AuthorList::default(),
            authors_en: AuthorList::default(),
        }
    }

    fn add_author(&mut self, row: &SubmissionRow) {
        self.authors_ja
            .push(row.author_name(Language::Ja), row.author_profile(Language::Ja));
        self.authors_en
            .push(row.author_name(Language::En), row.author_profile(Language::En));
    }

    fn has_authors(&self) -> bool {
        !self.authors_ja.is_empty() || !self.authors_en.is_empty()
    }

    fn finish(self) -> SubmissionPaper {
        SubmissionPaper {
            title_ja: self.title_ja,
            title_en: self.title_en,
            authors_ja: self.authors_ja,
            authors_en: self.authors_en,
            volume_no: self.volume_no,
            record: self.record,
        }
    }
}

/// Fold state threaded through the row sequence.
#[derive(Default)]
struct AggregationState {
    current: Option<PaperAccumulator>,
    rows: Vec<Arc<SubmissionRow>>,
    papers: Vec<SubmissionPaper>,
    stats: SubmissionStats,
}

impl AggregationState {
    fn push(mut self, row: SubmissionRow) -> Self {
        let row = Arc::new(row);
        self.stats.rows += 1;
        self.rows.push(Arc::clone(&row));

        if row.is_first_author() {
            self.flush();
            self.current = Some(PaperAccumulator::open(&row));
        }

        match self.current.as_mut() {
            Some(paper) => {
                if row.author_name_ja.is_empty() {
                    self.stats.empty_authors_ja += 1;
                }
                if row.author_name_en.is_empty() {
                    self.stats.empty_authors_en += 1;
                }
                paper.add_author(&row);
            }
            None => {
                debug!(
                    "Skipping author row {} (ordinal '{}') with no first-author row before it",
                    row.id(),
                    row.author_ordinal
                );
                self.stats.orphan_rows += 1;
            }
        }
        self
    }

    fn flush(&mut self) {
        if let Some(paper) = self.current.take() {
            if paper.has_authors() {
                self.papers.push(paper.finish());
            }
        }
    }

    fn finish(mut self) -> Aggregation {
        self.flush();
        self.stats.papers = self.papers.len();
        self.stats.unparsed_volumes = self
            .papers
            .iter()
            .filter(|p| p.volume_no.is_none())
            .count();
        Aggregation {
            rows: self.rows,
            papers: self.papers,
            stats: self.stats,
        }
    }
}

/// Output of [`aggregate_papers`].
pub struct Aggregation {
    pub rows: Vec<Arc<SubmissionRow>>,
    pub papers: Vec<SubmissionPaper>,
    pub stats: SubmissionStats,
}

/// Groups contiguous author rows into papers, in input order.
pub fn aggregate_papers<I>(rows: I) -> Aggregation
where
    I: IntoIterator<Item = SubmissionRow>,
{
    rows.into_iter()
        .fold(AggregationState::default(), AggregationState::push)
        .finish()
}

/// Lookup structures over the submission export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionIndex {
    pub records: MultiMap<SubmissionId, Arc<SubmissionRow>>,
    pub title_ja: MultiMap<String, Arc<SubmissionPaper>>,
    pub volume_ja: MultiMap<String, Arc<SubmissionPaper>>,
    pub title_en: MultiMap<String, Arc<SubmissionPaper>>,
    pub volume_en: MultiMap<String, Arc<SubmissionPaper>>,
    pub stats: SubmissionStats,
}

impl SubmissionIndex {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = SubmissionRow>,
    {
        let aggregation = aggregate_papers(rows);
        let mut index = Self {
            stats: aggregation.stats,
            ..Default::default()
        };
        for row in aggregation.rows {
            index.records.insert(row.id(), row);
        }
        for paper in aggregation.papers {
            index.insert_paper(paper);
        }
        index
    }

    fn insert_paper(&mut self, paper: SubmissionPaper) {
        let paper = Arc::new(paper);
        self.title_ja.insert(paper.title_ja.clone(), Arc::clone(&paper));
        self.title_en.insert(paper.title_en.clone(), Arc::clone(&paper));
        match (paper.volume_author(Language::Ja), paper.volume_author(Language::En)) {
            (Some(key_ja), Some(key_en)) => {
                self.volume_ja.insert(key_ja, Arc::clone(&paper));
                self.volume_en.insert(key_en, paper);
            }
            _ => debug!(
                "Submission {} has an unparseable volume '{}'; indexed by title only",
                paper.record.id(),
                paper.record.volume_raw
            ),
        }
    }

    pub fn titles(&self, language: Language) -> &MultiMap<String, Arc<SubmissionPaper>> {
        match language {
            Language::Ja => &self.title_ja,
            Language::En => &self.title_en,
        }
    }

    pub fn volume_authors(&self, language: Language) -> &MultiMap<String, Arc<SubmissionPaper>> {
        match language {
            Language::Ja => &self.volume_ja,
            Language::En => &self.volume_en,
        }
    }
}

/// Parses the submission export at most once.
#[derive(Debug, Default)]
pub struct SubmissionAggregator {
    index: Option<SubmissionIndex>,
}

impl SubmissionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_parsed(&self) -> bool {
        self.index.is_some()
    }

    /// Builds the index from `rows`. Returns `false` without touching the
    /// existing index when called again.
    pub fn parse<I>(&mut self, rows: I) -> bool
    where
        I: IntoIterator<Item = SubmissionRow>,
    {
        if self.already_parsed() {
            return false;
        }
        let index = SubmissionIndex::from_rows(rows);
        log_submission_stats(&index.stats);
        self.index = Some(index);
        true
    }

    pub fn parse_file(&mut self, path: &Path, header_lines: usize) -> Result<bool> {
        if self.already_parsed() {
            return Ok(false);
        }
        let rows = read_tsv(path, header_lines)?;
        let short_rows = rows
            .iter()
            .filter(|columns| columns.len() < SubmissionRow::COLUMN_COUNT)
            .count();
        if short_rows > 0 {
            debug!(
                "Submission system: {} rows have fewer than {} columns; missing columns read as empty",
                short_rows,
                SubmissionRow::COLUMN_COUNT
            );
        }
        Ok(self.parse(rows.iter().map(|columns| SubmissionRow::from_columns(columns.as_slice()))))
    }

    pub fn index(&self) -> Option<&SubmissionIndex> {
        self.index.as_ref()
    }

    pub fn into_index(self) -> Option<SubmissionIndex> {
        self.index
    }
}

fn log_submission_stats(stats: &SubmissionStats) {
    info!(
        "Submission system: {} rows aggregated into {} papers",
        stats.rows, stats.papers
    );
    if stats.empty_authors_ja > 0 || stats.empty_authors_en > 0 {
        info!(
            "Submission system: empty author names: {} (ja), {} (en)",
            stats.empty_authors_ja, stats.empty_authors_en
        );
    }
    if stats.unparsed_volumes > 0 {
        warn!(
            "Submission system: {} papers have an unparseable volume string and can only miss",
            stats.unparsed_volumes
        );
    }
    if stats.orphan_rows > 0 {
        warn!(
            "Submission system: {} author rows appeared before any first-author row",
            stats.orphan_rows
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ordinal: &str, title: &str, volume: &str, name: &str, member: &str) -> SubmissionRow {
        SubmissionRow {
            id_year: "2009".to_string(),
            id_sequence: title.to_lowercase(),
            title_ja: format!("{}（和）", title),
            title_en: title.to_string(),
            volume_raw: volume.to_string(),
            author_ordinal: ordinal.to_string(),
            author_name_ja: format!("{}（和）", name),
            author_name_en: name.to_string(),
            member_number: member.to_string(),
            org_name_ja: "東芝".to_string(),
            org_name_en: "Toshiba".to_string(),
            ..Default::default()
        }
    }

    fn sample_rows() -> Vec<SubmissionRow> {
        vec![
            row("1", "Alpha", "Vol.J93-D,No.5,pp.1-9", "Tanaka", "001"),
            row("2", "Alpha", "Vol.J93-D,No.5,pp.1-9", "Sato", ""),
            row("1", "Bravo", "Vol.J93-D,No.6,pp.10-19", "Suzuki", ""),
        ]
    }

    #[test]
    fn test_groups_rows_by_first_author() {
        let aggregation = aggregate_papers(sample_rows());
        assert_eq!(aggregation.papers.len(), 2);
        assert_eq!(aggregation.rows.len(), 3);

        let alpha = &aggregation.papers[0];
        assert_eq!(alpha.title_en, "Alpha");
        assert_eq!(alpha.volume_no.as_deref(), Some("j93-d_5_"));
        assert_eq!(alpha.authors_en.names(), &["Tanaka", "Sato"]);
        assert_eq!(alpha.authors_en.profiles(), &["（001）＠Toshiba", "＠Toshiba"]);
        assert_eq!(alpha.record.author_ordinal, "1");
    }

    #[test]
    fn test_author_and_profile_lists_have_equal_length() {
        let aggregation = aggregate_papers(sample_rows());
        for paper in &aggregation.papers {
            for language in [Language::Ja, Language::En] {
                let authors = paper.authors(language);
                assert_eq!(authors.names().len(), authors.profiles().len());
            }
        }
    }

    #[test]
    fn test_indices_use_volume_author_keys() {
        let index = SubmissionIndex::from_rows(sample_rows());
        let alpha = index.volume_en.get("j93-d_5_；Tanaka；Sato").unwrap();
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].title_en, "Alpha");
        assert!(index.volume_ja.contains_key("j93-d_5_；Tanaka（和）；Sato（和）"));
        assert!(index.title_ja.contains_key("Bravo（和）"));
        assert_eq!(index.records.key_count(), 2);
        assert_eq!(index.stats.papers, 2);
    }

    #[test]
    fn test_duplicate_keys_are_retained() {
        let rows = vec![
            row("1", "Alpha", "Vol.J93-D,No.5,pp.1-9", "Tanaka", ""),
            row("1", "Alpha Two", "Vol.J93-D,No.5,pp.20-29", "Tanaka", ""),
        ];
        let index = SubmissionIndex::from_rows(rows);
        assert!(index.volume_en.has_multiple_values("j93-d_5_；Tanaka"));
    }

    #[test]
    fn test_unparseable_volume_is_indexed_by_title_only() {
        let rows = vec![row("1", "Alpha", "to appear", "Tanaka", "")];
        let index = SubmissionIndex::from_rows(rows);
        assert!(index.volume_en.is_empty());
        assert!(index.volume_ja.is_empty());
        assert!(index.title_en.contains_key("Alpha"));
        assert_eq!(index.stats.unparsed_volumes, 1);
    }

    #[test]
    fn test_empty_author_names_are_counted() {
        let mut rows = sample_rows();
        rows[1].author_name_en.clear();
        let aggregation = aggregate_papers(rows);
        assert_eq!(aggregation.stats.empty_authors_en, 1);
        assert_eq!(aggregation.stats.empty_authors_ja, 0);
        assert_eq!(aggregation.papers[0].authors_en.len(), 2);
    }

    #[test]
    fn test_orphan_rows_are_skipped() {
        let mut rows = vec![row("2", "Alpha", "Vol.J93-D,No.5,pp.1-9", "Ghost", "")];
        rows.extend(sample_rows());
        let aggregation = aggregate_papers(rows);
        assert_eq!(aggregation.stats.orphan_rows, 1);
        assert_eq!(aggregation.papers.len(), 2);
        assert_eq!(aggregation.papers[0].authors_en.names(), &["Tanaka", "Sato"]);
    }

    #[test]
    fn test_second_parse_is_a_no_op() {
        let mut aggregator = SubmissionAggregator::new();
        assert!(aggregator.parse(sample_rows()));
        let first = aggregator.index().cloned().unwrap();

        assert!(!aggregator.parse(sample_rows()));
        assert_eq!(aggregator.index(), Some(&first));
        assert_eq!(first.volume_en.value_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let index = SubmissionIndex::from_rows(Vec::new());
        assert!(index.records.is_empty());
        assert_eq!(index.stats, SubmissionStats::default());
    }
}
