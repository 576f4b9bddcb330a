pub mod diagnostics;
pub mod keys;
pub mod matcher;
pub mod search;
pub mod submission;

pub use matcher::Matcher;
pub use search::{SearchIndex, SearchIndexer};
pub use submission::{SubmissionAggregator, SubmissionIndex};
