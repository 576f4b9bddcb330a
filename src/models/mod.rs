pub mod language;
pub mod matching;
pub mod papers;
pub mod records;
pub mod stats_models;

pub use language::Language;
pub use matching::{AnnotatedPaper, MatchDecision, MatchNote, MatchTier};
pub use papers::{AuthorList, SearchPaper, SubmissionPaper};
pub use records::{SearchRecord, SubmissionId, SubmissionRow};
