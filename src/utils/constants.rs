// src/utils/constants.rs

/// Column delimiter of every TSV file read or written.
pub const FIELD_DELIMITER: u8 = b'\t';

/// Output rows are consumed by a Windows-side importer.
pub const LINE_TERMINATOR: csv::Terminator = csv::Terminator::CRLF;

/// Joins author names inside a volume_author key and inside merged author columns.
pub const AUTHOR_DELIMITER: &str = "；";

/// The search system stores all authors of a paper in one column separated by this mark.
pub const SEARCH_AUTHOR_DELIMITER: char = '＠';

/// Separates an author's member number from the affiliation in a profile.
pub const PROFILE_AFFILIATION_MARK: char = '＠';

/// Separates the fields of a submission paper summary in the note column.
pub const NOTE_DELIMITER: &str = "｜＋｜";

pub const FULLWIDTH_SPACE: char = '\u{3000}';

pub const NO_HINTS: &str = "no hints";

pub const SINGLE_LANGUAGE_ROW: &str = "1";
pub const DUAL_LANGUAGE_ROW: &str = "2";

/// Both export formats start with two header lines.
pub const DEFAULT_HEADER_LINES: usize = 2;

/// The access log export has a single header line.
pub const DEFAULT_ACCESS_LOG_HEADER_LINES: usize = 1;

/// Column holding the primary-language paper id in a merged output row
/// (row type, language code, id, ...).
pub const ID_SORT_COLUMN: usize = 2;

pub const DEFAULT_MERGE_CONFIG_PATH: &str = "config/merge_affiliations.json";
pub const DEFAULT_DOWNLOADS_CONFIG_PATH: &str = "config/count_downloads.json";
