// src/matching/keys.rs
//! Join keys shared by both record systems.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::constants::AUTHOR_DELIMITER;

static VOLUME_ISSUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Vol.([A-Za-z0-9_]+[0-9]+-[A-Za-z0-9_]+),No.([0-9]+),")
        .expect("volume pattern is a valid regex")
});

/// Normalized volume/issue key, e.g. `("J93-D", "5")` -> `j93-d_5_`.
pub fn volume_no(volume: &str, num: &str) -> String {
    format!("{}_{}_", volume.to_lowercase(), num)
}

/// Pulls volume and issue out of a submission-system string such as
/// `Vol.J93-D,No.5,pp.567-575`.
pub fn parse_volume_issue(raw: &str) -> Option<(String, String)> {
    let captures = VOLUME_ISSUE_PATTERN.captures(raw)?;
    let volume = captures.get(1)?.as_str().to_string();
    let issue = captures.get(2)?.as_str().to_string();
    Some((volume, issue))
}

/// Volume key of a submission row, `None` when the raw string is malformed.
pub fn submission_volume_no(raw: &str) -> Option<String> {
    parse_volume_issue(raw).map(|(volume, issue)| volume_no(&volume, &issue))
}

/// Volume key followed by the author names in the order given.
/// Author order is significant: swapping two authors yields a different key.
pub fn volume_author<S: AsRef<str>>(volume_no: &str, authors: &[S]) -> String {
    let mut key = String::from(volume_no);
    key.push_str(AUTHOR_DELIMITER);
    let names: Vec<&str> = authors.iter().map(|a| a.as_ref()).collect();
    key.push_str(&names.join(AUTHOR_DELIMITER));
    key
}
