pub mod access_log;

pub use access_log::{count_record, AccessLogRecord, DownloadCounter};
