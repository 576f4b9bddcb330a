// src/matching/search.rs
//! Per-language indices over the search-system exports. The search system
//! already stores one row per paper, so every row becomes one paper.

use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::input::read_tsv;
use crate::models::papers::SearchPaper;
use crate::models::records::SearchRecord;
use crate::models::stats_models::SearchStats;
use crate::models::Language;
use crate::utils::multi_map::MultiMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageIndex {
    pub by_id: MultiMap<String, Arc<SearchPaper>>,
    pub by_title: MultiMap<String, Arc<SearchPaper>>,
    pub by_volume_author: MultiMap<String, Arc<SearchPaper>>,
}

impl LanguageIndex {
    /// Inserts the paper into all three indices. Returns `false` when its id was already present.
    fn insert(&mut self, paper: SearchPaper) -> bool {
        let paper = Arc::new(paper);
        let fresh_id = !self.by_id.contains_key(paper.id());
        self.by_id.insert(paper.id().to_string(), Arc::clone(&paper));
        self.by_title.insert(paper.title.clone(), Arc::clone(&paper));
        self.by_volume_author.insert(paper.volume_author(), paper);
        fresh_id
    }

    /// The paper published under `id`; the first one if the export repeats the id.
    pub fn paper(&self, id: &str) -> Option<&Arc<SearchPaper>> {
        self.by_id.first(id)
    }

    pub fn paper_count(&self) -> usize {
        self.by_id.value_count()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchIndex {
    languages: BTreeMap<Language, LanguageIndex>,
    pub stats: SearchStats,
}

impl SearchIndex {
    pub fn from_records(records: BTreeMap<Language, Vec<SearchRecord>>) -> Self {
        let mut index = Self::default();
        for (language, rows) in records {
            let language_index = index.languages.entry(language).or_default();
            index.stats.rows_by_language.insert(language, rows.len());
            for record in rows {
                let id = record.id.clone();
                if !language_index.insert(SearchPaper::from_record(language, record)) {
                    warn!("Search system ({}): id {} appears more than once", language, id);
                    index.stats.duplicate_ids += 1;
                }
            }
        }
        index
    }

    pub fn language(&self, language: Language) -> Option<&LanguageIndex> {
        self.languages.get(&language)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.keys().copied()
    }
}

/// Parses the search-system exports at most once.
#[derive(Debug, Default)]
pub struct SearchIndexer {
    index: Option<SearchIndex>,
}

impl SearchIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_parsed(&self) -> bool {
        self.index.is_some()
    }

    /// Builds the indices from per-language records. Returns `false` and keeps
    /// the existing indices when called again.
    pub fn parse(&mut self, records: BTreeMap<Language, Vec<SearchRecord>>) -> bool {
        if self.already_parsed() {
            return false;
        }
        let index = SearchIndex::from_records(records);
        for (language, rows) in &index.stats.rows_by_language {
            info!("Search system ({}): indexed {} papers", language, rows);
        }
        self.index = Some(index);
        true
    }

    pub fn parse_files(&mut self, files: &BTreeMap<Language, PathBuf>, header_lines: usize) -> Result<bool> {
        if self.already_parsed() {
            return Ok(false);
        }
        let mut records = BTreeMap::new();
        for (language, path) in files {
            let rows = read_tsv(path, header_lines)?;
            records.insert(
                *language,
                rows.iter()
                    .map(|columns| SearchRecord::from_columns(columns.as_slice()))
                    .collect(),
            );
        }
        Ok(self.parse(records))
    }

    pub fn index(&self) -> Option<&SearchIndex> {
        self.index.as_ref()
    }

    pub fn into_index(self) -> Option<SearchIndex> {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, authors: &str) -> SearchRecord {
        SearchRecord {
            id: id.to_string(),
            volume: "J93-D".to_string(),
            number: "5".to_string(),
            display_title: title.to_string(),
            author: authors.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> BTreeMap<Language, Vec<SearchRecord>> {
        let mut records = BTreeMap::new();
        records.insert(
            Language::Ja,
            vec![
                record("p1", "Bravo", "Tanaka＠Sato"),
                record("p2", "Alpha", "Tanaka＠Sato"),
                record("p3", "Charlie", "Suzuki"),
            ],
        );
        records.insert(Language::En, vec![record("p1", "Bravo EN", "Taro Tanaka")]);
        records
    }

    #[test]
    fn test_indexes_every_row_in_all_indices() {
        let index = SearchIndex::from_records(sample());
        let ja = index.language(Language::Ja).unwrap();
        assert_eq!(ja.paper_count(), 3);
        assert_eq!(ja.by_title.key_count(), 3);
        assert!(ja.by_volume_author.has_multiple_values("j93-d_5_；Tanaka；Sato"));
        assert!(!ja.by_volume_author.has_multiple_values("j93-d_5_；Suzuki"));
        assert_eq!(ja.paper("p2").unwrap().title, "Alpha");
    }

    #[test]
    fn test_languages_are_independent() {
        let index = SearchIndex::from_records(sample());
        let en = index.language(Language::En).unwrap();
        assert_eq!(en.paper_count(), 1);
        assert!(en.paper("p2").is_none());
        assert_eq!(index.languages().collect::<Vec<_>>(), vec![Language::Ja, Language::En]);
    }

    #[test]
    fn test_duplicate_ids_are_kept_and_counted() {
        let mut records = BTreeMap::new();
        records.insert(
            Language::Ja,
            vec![record("p1", "First", "A"), record("p1", "Second", "B")],
        );
        let index = SearchIndex::from_records(records);
        let ja = index.language(Language::Ja).unwrap();
        assert!(ja.by_id.has_multiple_values("p1"));
        assert_eq!(ja.paper("p1").unwrap().title, "First");
        assert_eq!(index.stats.duplicate_ids, 1);
    }

    #[test]
    fn test_second_parse_is_a_no_op() {
        let mut indexer = SearchIndexer::new();
        assert!(indexer.parse(sample()));
        let first = indexer.index().cloned().unwrap();

        assert!(!indexer.parse(sample()));
        assert_eq!(indexer.index(), Some(&first));
        assert_eq!(
            first.language(Language::Ja).unwrap().by_volume_author.value_count(),
            3
        );
    }
}
