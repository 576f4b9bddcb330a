// src/downloads/access_log.rs
//! Per-paper download counts from the search system's access log.

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::input::read_tsv;
use crate::utils::multi_map::MultiMap;

const DOWNLOAD_ACCESS_TYPE: &str = "type";
const LOGIN_ACCESS_TYPE: &str = "login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// A paper file was opened.
    Download,
    Login,
    Other,
}

/// One access-log line. Only the columns the counts depend on are named.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessLogRecord {
    pub id: String,
    pub log_date: String,
    pub user_id: String,
    pub society: String,
    pub file_name: String,
    pub category: String,
    pub access_type: String,
}

impl AccessLogRecord {
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        let column = |idx: usize| {
            columns
                .get(idx)
                .map(|c| c.as_ref().to_string())
                .unwrap_or_default()
        };
        Self {
            id: column(0),
            log_date: column(1),
            user_id: column(2),
            society: column(3),
            file_name: column(4),
            category: column(5),
            access_type: column(6),
        }
    }

    /// Lower-cased file name without a trailing `.pdf`.
    pub fn paper_id(&self) -> String {
        let name = self.file_name.to_lowercase();
        match name.strip_suffix(".pdf") {
            Some(stem) => stem.to_string(),
            None => name,
        }
    }

    pub fn kind(&self) -> AccessKind {
        match self.access_type.as_str() {
            DOWNLOAD_ACCESS_TYPE => AccessKind::Download,
            LOGIN_ACCESS_TYPE => AccessKind::Login,
            _ => AccessKind::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessLogIndex {
    pub records: Vec<Arc<AccessLogRecord>>,
    pub downloads_by_paper: MultiMap<String, Arc<AccessLogRecord>>,
    pub logins_by_user: MultiMap<String, Arc<AccessLogRecord>>,
}

impl AccessLogIndex {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AccessLogRecord>,
    {
        let mut index = Self::default();
        for record in records {
            let record = Arc::new(record);
            match record.kind() {
                AccessKind::Download => index
                    .downloads_by_paper
                    .insert(record.paper_id(), Arc::clone(&record)),
                AccessKind::Login => index
                    .logins_by_user
                    .insert(record.user_id.clone(), Arc::clone(&record)),
                AccessKind::Other => {}
            }
            index.records.push(record);
        }
        index
    }

    /// `(paper id, downloads)` in ascending paper id order.
    pub fn download_counts(&self) -> Vec<(&str, usize)> {
        self.downloads_by_paper
            .iter()
            .map(|(paper, records)| (paper.as_str(), records.len()))
            .collect()
    }

    /// `(user id, logins)` in ascending user id order.
    pub fn login_counts(&self) -> Vec<(&str, usize)> {
        self.logins_by_user
            .iter()
            .map(|(user, records)| (user.as_str(), records.len()))
            .collect()
    }
}

/// Output record `[id, count]`.
pub fn count_record(id: &str, count: usize) -> [String; 2] {
    [id.to_string(), count.to_string()]
}

/// Parses the access log at most once.
#[derive(Debug, Default)]
pub struct DownloadCounter {
    index: Option<AccessLogIndex>,
}

impl DownloadCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_parsed(&self) -> bool {
        self.index.is_some()
    }

    pub fn parse<I>(&mut self, records: I) -> bool
    where
        I: IntoIterator<Item = AccessLogRecord>,
    {
        if self.already_parsed() {
            return false;
        }
        let index = AccessLogIndex::from_records(records);
        info!(
            "Access log: {} rows, {} papers downloaded, {} users logged in",
            index.records.len(),
            index.downloads_by_paper.key_count(),
            index.logins_by_user.key_count()
        );
        self.index = Some(index);
        true
    }

    pub fn parse_file(&mut self, path: &Path, header_lines: usize) -> Result<bool> {
        if self.already_parsed() {
            return Ok(false);
        }
        let rows = read_tsv(path, header_lines)?;
        Ok(self.parse(
            rows.iter()
                .map(|columns| AccessLogRecord::from_columns(columns.as_slice())),
        ))
    }

    pub fn index(&self) -> Option<&AccessLogIndex> {
        self.index.as_ref()
    }
}
