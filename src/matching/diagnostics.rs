// src/matching/diagnostics.rs
//! Duplicate-key reports over the built indices.
//!
//! Titles and volume_author keys are supposed to be close to unique. A key
//! holding several papers is either a genuine collision (same authors, same
//! issue) or a sign the source export repeated a paper; the count of distinct
//! titles under duplicated keys tells the two apart.

use log::info;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::matching::search::SearchIndex;
use crate::matching::submission::SubmissionIndex;
use crate::models::papers::{SearchPaper, SubmissionPaper};
use crate::models::Language;
use crate::utils::multi_map::MultiMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DuplicateReport {
    pub index_name: String,
    pub keys: usize,
    pub duplicated_keys: usize,
    /// Values stored under keys that hold more than one value.
    pub duplicated_entries: usize,
    /// Distinct titles among `duplicated_entries`.
    pub distinct_titles: usize,
}

impl DuplicateReport {
    pub fn build<V, F>(index_name: impl Into<String>, map: &MultiMap<String, V>, title: F) -> Self
    where
        F: Fn(&V) -> String,
    {
        let mut report = Self {
            index_name: index_name.into(),
            keys: map.key_count(),
            ..Default::default()
        };
        let mut titles = BTreeSet::new();
        for (_, values) in map.iter().filter(|(_, values)| values.len() > 1) {
            report.duplicated_keys += 1;
            report.duplicated_entries += values.len();
            titles.extend(values.iter().map(|v| title(v)));
        }
        report.distinct_titles = titles.len();
        report
    }

    pub fn has_duplicates(&self) -> bool {
        self.duplicated_keys > 0
    }

    pub fn log(&self) {
        info!(
            "🔍 {}: {} keys, {} duplicated ({} entries, {} distinct titles)",
            self.index_name, self.keys, self.duplicated_keys, self.duplicated_entries, self.distinct_titles
        );
    }
}

fn submission_title(language: Language) -> impl Fn(&Arc<SubmissionPaper>) -> String {
    move |paper: &Arc<SubmissionPaper>| paper.title(language).to_string()
}

fn search_title(paper: &Arc<SearchPaper>) -> String {
    paper.title.clone()
}

/// Reports for every title and volume_author index, submission side first.
pub fn duplicate_reports(submission: &SubmissionIndex, search: &SearchIndex) -> Vec<DuplicateReport> {
    let mut reports = Vec::new();
    for language in [Language::Ja, Language::En] {
        reports.push(DuplicateReport::build(
            format!("submission title ({})", language),
            submission.titles(language),
            submission_title(language),
        ));
        reports.push(DuplicateReport::build(
            format!("submission volume_author ({})", language),
            submission.volume_authors(language),
            submission_title(language),
        ));
    }
    for language in search.languages() {
        if let Some(index) = search.language(language) {
            reports.push(DuplicateReport::build(
                format!("search title ({})", language),
                &index.by_title,
                search_title,
            ));
            reports.push(DuplicateReport::build(
                format!("search volume_author ({})", language),
                &index.by_volume_author,
                search_title,
            ));
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_only_duplicated_keys() {
        let mut map: MultiMap<String, String> = MultiMap::new();
        map.insert("k1".to_string(), "Alpha".to_string());
        map.insert("k1".to_string(), "Alpha".to_string());
        map.insert("k1".to_string(), "Bravo".to_string());
        map.insert("k2".to_string(), "Charlie".to_string());

        let report = DuplicateReport::build("test", &map, |v: &String| v.clone());
        assert_eq!(report.keys, 2);
        assert_eq!(report.duplicated_keys, 1);
        assert_eq!(report.duplicated_entries, 3);
        assert_eq!(report.distinct_titles, 2);
        assert!(report.has_duplicates());
    }

    #[test]
    fn test_empty_indices_have_no_duplicates() {
        let reports = duplicate_reports(&SubmissionIndex::default(), &SearchIndex::default());
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| !r.has_duplicates() && r.keys == 0));
    }
}
