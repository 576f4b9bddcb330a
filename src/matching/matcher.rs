// src/matching/matcher.rs
//! Links every primary-language search paper to the submission system.
//!
//! Keys of the primary language's volume_author index are walked in
//! ascending order and every search paper under a key gets exactly one
//! decision:
//!
//! 1. No submission paper under the key: fall back to the other language.
//!    The paper's counterpart (same id) is looked up in the other search
//!    export and its own volume_author key is looked up in the
//!    submission system's other-language index (`EN_FULL_MATCH`,
//!    `EN_VOL_AUTHOR_MATCH`, or `NOT_MATCHED`).
//! 2. Several search papers under the key: both sides are sorted by title
//!    and paired by position (`MULTI_VOL_AUTHOR_MATCH`). Search papers left
//!    over when the submission side is shorter stay unpaired and are
//!    reported as `NOT_MATCHED`.
//! 3. One search paper and one submission paper: `FULL_MATCH` when the
//!    titles agree, `VOL_AUTHOR_MATCH` otherwise.
//!
//! When the submission side holds several papers under a key that has a
//! single search paper, a candidate with an identical title wins
//! (`FULL_MATCH`); without one the paper goes through the pairing of rule 2.

use anyhow::{anyhow, Result};
use indicatif::ProgressBar;
use log::{debug, warn};
use std::sync::Arc;

use crate::matching::search::{LanguageIndex, SearchIndex};
use crate::matching::submission::SubmissionIndex;
use crate::models::matching::{AnnotatedPaper, MatchDecision, MatchNote, MatchTier};
use crate::models::papers::{SearchPaper, SubmissionPaper};
use crate::models::Language;

pub struct Matcher<'a> {
    submission: &'a SubmissionIndex,
    primary: Language,
    primary_index: &'a LanguageIndex,
    /// The other language's search index, when that export was supplied.
    secondary_index: Option<&'a LanguageIndex>,
}

impl<'a> Matcher<'a> {
    pub fn new(
        submission: &'a SubmissionIndex,
        search: &'a SearchIndex,
        primary: Language,
    ) -> Result<Self> {
        let primary_index = search
            .language(primary)
            .ok_or_else(|| anyhow!("No search-system data loaded for primary language '{}'", primary))?;
        Ok(Self {
            submission,
            primary,
            primary_index,
            secondary_index: search.language(primary.other()),
        })
    }

    pub fn primary(&self) -> Language {
        self.primary
    }

    pub fn secondary(&self) -> Option<Language> {
        self.secondary_index.map(|_| self.secondary_language())
    }

    fn secondary_language(&self) -> Language {
        self.primary.other()
    }

    /// Number of distinct primary keys, the unit of progress.
    pub fn key_count(&self) -> usize {
        self.primary_index.by_volume_author.key_count()
    }

    pub fn run(&self) -> Vec<MatchDecision> {
        self.run_with_progress(None)
    }

    pub fn run_with_progress(&self, progress: Option<&ProgressBar>) -> Vec<MatchDecision> {
        let mut decisions = Vec::with_capacity(self.primary_index.paper_count());
        for (key, papers) in self.primary_index.by_volume_author.iter() {
            self.decide_key(key, papers, &mut decisions);
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
        decisions
    }

    fn decide_key(&self, key: &str, papers: &[Arc<SearchPaper>], out: &mut Vec<MatchDecision>) {
        let candidates = self.submission.volume_authors(self.primary).get(key);
        match (candidates, papers) {
            (None, _) => {
                for paper in sorted_by_title(papers, |p| p.title.as_str()) {
                    out.push(self.cross_language_decision(key, &paper));
                }
            }
            (Some(candidates), [paper]) => self.single_paper_decision(key, paper, candidates, out),
            (Some(candidates), _) => {
                let papers = sorted_by_title(papers, |p| p.title.as_str());
                self.paired_decisions(key, &papers, candidates, out);
            }
        }
    }

    /// Rule 1: look up the other language with the counterpart's own key.
    fn cross_language_decision(&self, key: &str, paper: &Arc<SearchPaper>) -> MatchDecision {
        let Some(counterpart) = self.counterpart(paper) else {
            return self.decision(key, paper, Vec::new(), None, MatchTier::NotMatched, MatchNote::NoHints);
        };

        let secondary = self.secondary_language();
        let hint_key = counterpart.volume_author();
        let hint = self
            .submission
            .volume_authors(secondary)
            .get(&hint_key)
            .and_then(|candidates| pick_by_title(candidates, secondary, &counterpart.title));

        match hint {
            None => self.decision(
                key,
                paper,
                Vec::new(),
                Some(AnnotatedPaper::bare(counterpart)),
                MatchTier::NotMatched,
                MatchNote::NoHints,
            ),
            Some((candidate, titles_equal)) => {
                let tier = if titles_equal {
                    MatchTier::EnFullMatch
                } else {
                    MatchTier::EnVolAuthorMatch
                };
                debug!("{} matched through {} key {}", paper.id(), secondary, hint_key);
                self.decision(
                    key,
                    paper,
                    self.profiles(&candidate, self.primary),
                    Some(AnnotatedPaper::new(counterpart, self.profiles(&candidate, secondary))),
                    tier,
                    MatchNote::Candidate(candidate),
                )
            }
        }
    }

    /// Rule 3, plus the single-search/multi-submission case.
    fn single_paper_decision(
        &self,
        key: &str,
        paper: &Arc<SearchPaper>,
        candidates: &[Arc<SubmissionPaper>],
        out: &mut Vec<MatchDecision>,
    ) {
        let chosen = match candidates {
            [candidate] => Some(Arc::clone(candidate)),
            _ => candidates
                .iter()
                .find(|c| c.title(self.primary) == paper.title)
                .cloned(),
        };
        let Some(candidate) = chosen else {
            debug!(
                "{} submission papers share key {} with one search paper; pairing by title",
                candidates.len(),
                key
            );
            self.paired_decisions(key, std::slice::from_ref(paper), candidates, out);
            return;
        };

        let tier = if candidate.title(self.primary) == paper.title {
            MatchTier::FullMatch
        } else {
            MatchTier::VolAuthorMatch
        };
        let secondary_profiles = self.profiles(&candidate, self.secondary_language());
        out.push(self.decision(
            key,
            paper,
            self.profiles(&candidate, self.primary),
            self.counterpart(paper)
                .map(|c| AnnotatedPaper::new(c, secondary_profiles)),
            tier,
            MatchNote::Candidate(candidate),
        ));
    }

    /// Rule 2: `papers` must already be sorted by title.
    fn paired_decisions(
        &self,
        key: &str,
        papers: &[Arc<SearchPaper>],
        candidates: &[Arc<SubmissionPaper>],
        out: &mut Vec<MatchDecision>,
    ) {
        let candidates = sorted_by_title(candidates, |c| c.title(self.primary));
        if papers.len() > candidates.len() {
            warn!(
                "Key {}: {} search papers but only {} submission candidates; {} left unpaired",
                key,
                papers.len(),
                candidates.len(),
                papers.len() - candidates.len()
            );
        }

        for (i, paper) in papers.iter().enumerate() {
            let Some(candidate) = candidates.get(i) else {
                out.push(self.decision(
                    key,
                    paper,
                    Vec::new(),
                    self.counterpart(paper).map(AnnotatedPaper::bare),
                    MatchTier::NotMatched,
                    MatchNote::Unpaired,
                ));
                continue;
            };

            // single-author papers are left without affiliations
            let (primary_profiles, secondary_profiles) = if paper.authors.len() > 1 {
                (
                    self.profiles(candidate, self.primary),
                    self.profiles(candidate, self.secondary_language()),
                )
            } else {
                (Vec::new(), Vec::new())
            };
            out.push(self.decision(
                key,
                paper,
                primary_profiles,
                self.counterpart(paper)
                    .map(|c| AnnotatedPaper::new(c, secondary_profiles)),
                MatchTier::MultiVolAuthorMatch,
                MatchNote::Candidate(Arc::clone(candidate)),
            ));
        }
    }

    /// Same paper in the other language. Missing counterparts are not an error.
    fn counterpart(&self, paper: &SearchPaper) -> Option<Arc<SearchPaper>> {
        self.secondary_index?.paper(paper.id()).cloned()
    }

    fn profiles(&self, candidate: &SubmissionPaper, language: Language) -> Vec<String> {
        candidate.authors(language).profiles().to_vec()
    }

    fn decision(
        &self,
        key: &str,
        paper: &Arc<SearchPaper>,
        profiles: Vec<String>,
        secondary: Option<AnnotatedPaper>,
        tier: MatchTier,
        note: MatchNote,
    ) -> MatchDecision {
        MatchDecision {
            key: key.to_string(),
            primary: AnnotatedPaper::new(Arc::clone(paper), profiles),
            secondary,
            tier,
            note,
        }
    }
}

/// Stable sort by title; papers with equal titles keep index order.
fn sorted_by_title<T, F>(items: &[Arc<T>], title: F) -> Vec<Arc<T>>
where
    F: Fn(&T) -> &str,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| title(&**a).cmp(title(&**b)));
    sorted
}

/// Prefers the candidate whose title equals `title`, else the first by title order.
fn pick_by_title(
    candidates: &[Arc<SubmissionPaper>],
    language: Language,
    title: &str,
) -> Option<(Arc<SubmissionPaper>, bool)> {
    if let Some(exact) = candidates.iter().find(|c| c.title(language) == title) {
        return Some((Arc::clone(exact), true));
    }
    candidates
        .iter()
        .min_by(|a, b| a.title(language).cmp(b.title(language)))
        .map(|first| (Arc::clone(first), false))
}
