// src/models/records.rs
//! Raw rows of the two exports, one struct per line format.

use std::fmt;

use crate::models::language::Language;
use crate::utils::constants::{FULLWIDTH_SPACE, PROFILE_AFFILIATION_MARK, SEARCH_AUTHOR_DELIMITER};

fn column<S: AsRef<str>>(columns: &[S], idx: usize) -> String {
    columns
        .get(idx)
        .map(|c| c.as_ref().to_string())
        .unwrap_or_default()
}

fn normalize_spaces(value: &str) -> String {
    value.replace(FULLWIDTH_SPACE, " ")
}

/// Submission receipt number, split by the intake system into year and sequence parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId {
    pub year: String,
    pub sequence: String,
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.sequence)
    }
}

/// One author-affiliation line of the submission-system export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionRow {
    pub id_year: String,
    pub id_sequence: String,
    pub special_issue_code: String,
    pub title_ja: String,
    pub title_en: String,
    /// e.g. `Vol.J93-D,No.5,pp.567-575`
    pub volume_raw: String,
    pub author_ordinal: String,
    pub author_name_ja: String,
    pub author_name_en: String,
    pub member_number: String,
    pub org_code: String,
    pub org_name_ja: String,
    pub org_name_en: String,
}

impl SubmissionRow {
    pub const COLUMN_COUNT: usize = 13;

    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            id_year: column(columns, 0),
            id_sequence: column(columns, 1),
            special_issue_code: column(columns, 2),
            title_ja: column(columns, 3),
            title_en: column(columns, 4),
            volume_raw: column(columns, 5),
            author_ordinal: column(columns, 6),
            author_name_ja: normalize_spaces(&column(columns, 7)),
            author_name_en: normalize_spaces(&column(columns, 8)),
            member_number: column(columns, 9),
            org_code: column(columns, 10),
            org_name_ja: column(columns, 11),
            org_name_en: column(columns, 12),
        }
    }

    pub fn id(&self) -> SubmissionId {
        SubmissionId {
            year: self.id_year.clone(),
            sequence: self.id_sequence.clone(),
        }
    }

    pub fn is_first_author(&self) -> bool {
        self.author_ordinal == "1"
    }

    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::Ja => &self.title_ja,
            Language::En => &self.title_en,
        }
    }

    pub fn author_name(&self, language: Language) -> &str {
        match language {
            Language::Ja => &self.author_name_ja,
            Language::En => &self.author_name_en,
        }
    }

    pub fn org_name(&self, language: Language) -> &str {
        match language {
            Language::Ja => &self.org_name_ja,
            Language::En => &self.org_name_en,
        }
    }

    /// Text appended after the author's name in merged output: `（member）＠affiliation`,
    /// or just `＠affiliation` for non-members.
    pub fn author_profile(&self, language: Language) -> String {
        let org = self.org_name(language);
        if self.member_number.is_empty() {
            format!("{}{}", PROFILE_AFFILIATION_MARK, org)
        } else {
            format!("（{}）{}{}", self.member_number, PROFILE_AFFILIATION_MARK, org)
        }
    }
}

/// One paper of a search-system export (one file per language).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRecord {
    pub id: String,
    pub volume: String,
    pub number: String,
    pub start_page: String,
    pub end_page: String,
    pub date: String,
    pub title: String,
    /// All authors in one column, separated by `＠`.
    pub author: String,
    pub abstract_text: String,
    pub keywords: String,
    pub section: String,
    pub category: String,
    pub field_id: String,
    pub category_name: String,
    pub display_title: String,
    pub display_author: String,
    pub display_abstract: String,
    pub display_keywords: String,
    /// Erratum references, flags and other columns only carried through to output.
    pub admin_columns: Vec<String>,
}

impl SearchRecord {
    pub const FIXED_COLUMN_COUNT: usize = 18;

    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        let admin_columns = columns
            .iter()
            .skip(Self::FIXED_COLUMN_COUNT)
            .map(|c| c.as_ref().to_string())
            .collect();
        Self {
            id: column(columns, 0),
            volume: column(columns, 1),
            number: column(columns, 2),
            start_page: column(columns, 3),
            end_page: column(columns, 4),
            date: column(columns, 5),
            title: column(columns, 6),
            author: column(columns, 7),
            abstract_text: column(columns, 8),
            keywords: column(columns, 9),
            section: column(columns, 10),
            category: column(columns, 11),
            field_id: column(columns, 12),
            category_name: column(columns, 13),
            display_title: column(columns, 14),
            display_author: column(columns, 15),
            display_abstract: column(columns, 16),
            display_keywords: column(columns, 17),
            admin_columns,
        }
    }

    /// Author names in published order. Trailing empty entries are dropped.
    pub fn authors(&self) -> Vec<String> {
        let mut authors: Vec<String> = normalize_spaces(&self.author)
            .split(SEARCH_AUTHOR_DELIMITER)
            .map(str::to_string)
            .collect();
        while authors.last().is_some_and(|a| a.is_empty()) {
            authors.pop();
        }
        authors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission_columns() -> Vec<&'static str> {
        vec![
            "2009", "0123", "", "日本語タイトル", "English Title",
            "Vol.J93-D,No.5,pp.567-575", "1", "田中\u{3000}太郎", "Taro\u{3000}Tanaka",
            "0012345", "ORG1", "東芝", "Toshiba",
        ]
    }

    #[test]
    fn test_submission_row_columns() {
        let row = SubmissionRow::from_columns(submission_columns().as_slice());
        assert_eq!(row.id().to_string(), "2009-0123");
        assert!(row.is_first_author());
        assert_eq!(row.author_name(Language::Ja), "田中 太郎");
        assert_eq!(row.author_name(Language::En), "Taro Tanaka");
        assert_eq!(row.title(Language::En), "English Title");
    }

    #[test]
    fn test_author_profile_with_and_without_member_number() {
        let mut row = SubmissionRow::from_columns(submission_columns().as_slice());
        assert_eq!(row.author_profile(Language::Ja), "（0012345）＠東芝");
        assert_eq!(row.author_profile(Language::En), "（0012345）＠Toshiba");

        row.member_number.clear();
        assert_eq!(row.author_profile(Language::En), "＠Toshiba");
    }

    #[test]
    fn test_short_submission_row_reads_empty_columns() {
        let row = SubmissionRow::from_columns(&["2009", "0001", "", "t", "T", "v", "2"]);
        assert!(!row.is_first_author());
        assert_eq!(row.org_name_en, "");
        assert_eq!(row.author_profile(Language::En), "＠");
    }

    #[test]
    fn test_search_record_authors_and_admin_columns() {
        let mut columns: Vec<String> = (0..20).map(|i| format!("c{}", i)).collect();
        columns[7] = "田中\u{3000}太郎＠佐藤\u{3000}花子＠".to_string();
        let record = SearchRecord::from_columns(columns.as_slice());

        assert_eq!(record.authors(), vec!["田中 太郎", "佐藤 花子"]);
        assert_eq!(record.display_title, "c14");
        assert_eq!(record.admin_columns, vec!["c18", "c19"]);
    }

    #[test]
    fn test_search_record_without_authors() {
        let record = SearchRecord::from_columns(&["id1", "J93-D", "5"]);
        assert!(record.authors().is_empty());
        assert!(record.admin_columns.is_empty());
    }
}
