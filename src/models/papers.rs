// src/models/papers.rs
use std::sync::Arc;

use crate::matching::keys::{volume_author, volume_no};
use crate::models::language::Language;
use crate::models::records::{SearchRecord, SubmissionRow};

/// Author names with their profiles, kept as parallel lists of equal length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorList {
    names: Vec<String>,
    profiles: Vec<String>,
}

impl AuthorList {
    pub fn push(&mut self, name: impl Into<String>, profile: impl Into<String>) {
        self.names.push(name.into());
        self.profiles.push(profile.into());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A submission-system paper aggregated from its per-author rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPaper {
    pub title_ja: String,
    pub title_en: String,
    pub authors_ja: AuthorList,
    pub authors_en: AuthorList,
    /// `None` when the raw volume string could not be parsed.
    pub volume_no: Option<String>,
    /// The first-author row the paper was opened with.
    pub record: Arc<SubmissionRow>,
}

impl SubmissionPaper {
    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::Ja => &self.title_ja,
            Language::En => &self.title_en,
        }
    }

    pub fn authors(&self, language: Language) -> &AuthorList {
        match language {
            Language::Ja => &self.authors_ja,
            Language::En => &self.authors_en,
        }
    }

    pub fn volume_author(&self, language: Language) -> Option<String> {
        self.volume_no
            .as_deref()
            .map(|volume| volume_author(volume, self.authors(language).names()))
    }
}

/// A search-system paper in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaper {
    pub language: Language,
    /// Display title.
    pub title: String,
    pub authors: Vec<String>,
    pub volume_no: String,
    pub record: Arc<SearchRecord>,
}

impl SearchPaper {
    pub fn from_record(language: Language, record: SearchRecord) -> Self {
        Self {
            language,
            title: record.display_title.clone(),
            authors: record.authors(),
            volume_no: volume_no(&record.volume, &record.number),
            record: Arc::new(record),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn volume_author(&self) -> String {
        volume_author(&self.volume_no, &self.authors)
    }
}
