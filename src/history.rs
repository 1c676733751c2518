use std::sync::LazyLock;

use regex::Regex;

const COMMIT_MARKER: &str = "commit ";

static COMMIT_ID: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?:[0-9a-f]{40}|[0-9a-f]{64})$").expect("valid commit id regex"));

/// Pulls commit identifiers out of plain `git log` text.
///
/// Only lines containing `"commit "` are kept, and every occurrence of that token is
/// removed from them. Order is the order of the log, newest first.
pub fn extract_commit_ids(log: &str) -> Vec<String> {
  log
    .lines()
    .filter(|line| line.contains(COMMIT_MARKER))
    .map(|line| line.replace(COMMIT_MARKER, ""))
    .collect()
}

pub fn is_commit_id(candidate: &str) -> bool { COMMIT_ID.is_match(candidate) }
