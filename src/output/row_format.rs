// src/output/row_format.rs
//! Renders match decisions as output TSV rows.
//!
//! A row is the row type (`1` single-language, `2` dual-language), one block
//! per language, the tier label and the note, followed by an empty trailing
//! column. Rows are written as CRLF-terminated records by the output writer.

use crate::models::matching::{AnnotatedPaper, MatchDecision, MatchNote};
use crate::models::papers::SubmissionPaper;
use crate::models::Language;
use crate::utils::constants::{
    AUTHOR_DELIMITER, DUAL_LANGUAGE_ROW, NOTE_DELIMITER, NO_HINTS, SINGLE_LANGUAGE_ROW,
};

/// Joins each author with the profile at the same position. Authors beyond
/// the end of `profiles` are written bare.
pub fn merge_authors_and_affiliations<A, P>(authors: &[A], profiles: &[P]) -> String
where
    A: AsRef<str>,
    P: AsRef<str>,
{
    authors
        .iter()
        .enumerate()
        .map(|(i, author)| {
            let profile = profiles.get(i).map(|p| p.as_ref()).unwrap_or("");
            format!("{}{}", author.as_ref(), profile)
        })
        .collect::<Vec<_>>()
        .join(AUTHOR_DELIMITER)
}

/// Summary of the submission paper a decision points at.
pub fn submission_summary(paper: &SubmissionPaper) -> String {
    [
        paper.record.id_year.clone(),
        paper.record.id_sequence.clone(),
        paper.volume_no.clone().unwrap_or_default(),
        paper.title_ja.clone(),
        paper.title_en.clone(),
        merge_authors_and_affiliations(paper.authors_ja.names(), paper.authors_ja.profiles()),
        merge_authors_and_affiliations(paper.authors_en.names(), paper.authors_en.profiles()),
    ]
    .join(NOTE_DELIMITER)
}

pub fn note_text(note: &MatchNote) -> String {
    match note {
        MatchNote::Candidate(paper) => submission_summary(paper),
        MatchNote::NoHints | MatchNote::Unpaired => NO_HINTS.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowFormatter {
    pub include_admin_columns: bool,
}

impl RowFormatter {
    pub fn new(include_admin_columns: bool) -> Self {
        Self {
            include_admin_columns,
        }
    }

    fn language_block(&self, language: Language, annotated: &AnnotatedPaper, columns: &mut Vec<String>) {
        let paper = &annotated.paper;
        let record = &paper.record;
        columns.extend([
            language.code().to_string(),
            record.id.clone(),
            record.volume.clone(),
            record.number.clone(),
            record.start_page.clone(),
            record.end_page.clone(),
            record.date.clone(),
            record.display_title.clone(),
            merge_authors_and_affiliations(paper.authors.as_slice(), annotated.profiles.as_slice()),
            record.display_abstract.clone(),
            record.display_keywords.clone(),
            record.category.clone(),
            record.category_name.clone(),
        ]);
        if self.include_admin_columns {
            columns.extend(record.admin_columns.iter().cloned());
        }
    }

    /// Output columns of a decision.
    pub fn columns(&self, decision: &MatchDecision) -> Vec<String> {
        let mut columns = Vec::new();
        columns.push(
            if decision.is_dual_language() {
                DUAL_LANGUAGE_ROW
            } else {
                SINGLE_LANGUAGE_ROW
            }
            .to_string(),
        );
        self.language_block(decision.primary.paper.language, &decision.primary, &mut columns);
        if let Some(secondary) = &decision.secondary {
            self.language_block(secondary.paper.language, secondary, &mut columns);
        }
        columns.push(decision.tier.label().to_string());
        columns.push(note_text(&decision.note));
        // trailing empty column before the terminator
        columns.push(String::new());
        columns
    }
}
