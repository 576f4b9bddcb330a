// src/models/matching.rs
use std::fmt;
use std::sync::Arc;

use crate::models::papers::{SearchPaper, SubmissionPaper};

/// Confidence tiers, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    /// Volume, authors and title agree in the primary language.
    FullMatch,
    /// Volume, authors and title agree only through the other language.
    EnFullMatch,
    /// Volume and authors agree in the primary language, title differs.
    VolAuthorMatch,
    /// Volume and authors agree only through the other language, title differs.
    EnVolAuthorMatch,
    /// Several papers share the volume_author key; paired by title order.
    MultiVolAuthorMatch,
    NotMatched,
}

impl MatchTier {
    pub const ALL: [MatchTier; 6] = [
        MatchTier::FullMatch,
        MatchTier::EnFullMatch,
        MatchTier::VolAuthorMatch,
        MatchTier::EnVolAuthorMatch,
        MatchTier::MultiVolAuthorMatch,
        MatchTier::NotMatched,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::FullMatch => "FULL_MATCH",
            MatchTier::EnFullMatch => "EN_FULL_MATCH",
            MatchTier::VolAuthorMatch => "VOL_AUTHOR_MATCH",
            MatchTier::EnVolAuthorMatch => "EN_VOL_AUTHOR_MATCH",
            MatchTier::MultiVolAuthorMatch => "MULTI_VOL_AUTHOR_MATCH",
            MatchTier::NotMatched => "NOT_MATCHED",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MatchTier::FullMatch => "✅",
            MatchTier::EnFullMatch => "🔁",
            MatchTier::VolAuthorMatch => "🟡",
            MatchTier::EnVolAuthorMatch => "🟠",
            MatchTier::MultiVolAuthorMatch => "🔀",
            MatchTier::NotMatched => "❌",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Free-text note attached to a decision for the reviewer.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchNote {
    NoHints,
    /// The search paper shared its key with more papers than the submission
    /// side had candidates and was left without a pair. Rendered like `NoHints`.
    Unpaired,
    Candidate(Arc<SubmissionPaper>),
}

impl MatchNote {
    pub fn candidate(&self) -> Option<&Arc<SubmissionPaper>> {
        match self {
            MatchNote::Candidate(paper) => Some(paper),
            MatchNote::NoHints | MatchNote::Unpaired => None,
        }
    }
}

/// A search paper plus the affiliation profiles to merge into its author column.
/// An empty profile list leaves the author names bare.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPaper {
    pub paper: Arc<SearchPaper>,
    pub profiles: Vec<String>,
}

impl AnnotatedPaper {
    pub fn new(paper: Arc<SearchPaper>, profiles: Vec<String>) -> Self {
        Self { paper, profiles }
    }

    pub fn bare(paper: Arc<SearchPaper>) -> Self {
        Self::new(paper, Vec::new())
    }
}

/// Outcome of matching one primary-language search paper.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDecision {
    /// Primary-language volume_author key the paper was found under.
    pub key: String,
    pub primary: AnnotatedPaper,
    /// Same paper in the other language, when the search system supplied it.
    pub secondary: Option<AnnotatedPaper>,
    pub tier: MatchTier,
    pub note: MatchNote,
}

impl MatchDecision {
    pub fn is_dual_language(&self) -> bool {
        self.secondary.is_some()
    }
}
