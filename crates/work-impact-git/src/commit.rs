// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Commit records and impact scoring

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Weight applied to each changed file when scoring a commit
pub const FILE_WEIGHT: u64 = 200;

static MERGE_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Merge (branch|pull request|remote-tracking branch)")
        .expect("merge subject pattern is valid")
});

/// Per-file line counts reported by `git log --numstat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Path as printed by git
    pub file: String,
    /// Lines added (0 for binary files)
    pub lines_added: u64,
    /// Lines deleted (0 for binary files)
    pub lines_deleted: u64,
    /// Both counts were reported as `-`
    pub is_binary: bool,
}

/// A commit parsed from one log block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Commit hash (7-40 hex characters)
    pub hash: String,
    /// Author date
    pub date: DateTime<Utc>,
    /// First line of the commit message
    pub subject: String,
    /// Remaining non-blank message lines
    pub body: String,
    /// Number of entries in `files`
    pub files_changed: usize,
    /// Sum of `lines_added` over `files`
    pub lines_added: u64,
    /// Sum of `lines_deleted` over `files`
    pub lines_deleted: u64,
    /// Per-file changes in git's output order
    pub files: Vec<FileChange>,
    /// Subject looks like a merge commit message
    pub is_merge: bool,
}

impl CommitRecord {
    /// Build a record, deriving the totals and merge flag from the inputs
    #[must_use]
    pub fn new(
        hash: String,
        date: DateTime<Utc>,
        subject: String,
        body: String,
        files: Vec<FileChange>,
    ) -> Self {
        let lines_added = saturating_sum(files.iter().map(|f| f.lines_added));
        let lines_deleted = saturating_sum(files.iter().map(|f| f.lines_deleted));
        let is_merge = is_merge_subject(&subject);
        Self {
            hash,
            date,
            subject,
            body,
            files_changed: files.len(),
            lines_added,
            lines_deleted,
            files,
            is_merge,
        }
    }

    /// Validate that a hash is 7 to 40 hex characters
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        (7..=40).contains(&hash.len()) && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..7.min(self.hash.len())]
    }

    /// Total churn: lines added plus lines deleted
    #[must_use]
    pub fn lines_changed(&self) -> u64 {
        self.lines_added.saturating_add(self.lines_deleted)
    }
}

pub(crate) fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// Check whether a subject line starts with a known merge message prefix
#[must_use]
pub fn is_merge_subject(subject: &str) -> bool {
    MERGE_SUBJECT.is_match(subject)
}

/// Distinct file extensions in first-seen order
///
/// The extension is whatever follows the last `.` in the path. Paths without
/// a `.` contribute nothing.
#[must_use]
pub fn file_types(files: &[FileChange]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for change in files {
        let Some((_, ext)) = change.file.rsplit_once('.') else {
            continue;
        };
        if !ext.is_empty() && !types.iter().any(|t| t == ext) {
            types.push(ext.to_string());
        }
    }
    types
}

/// Impact score: line churn plus a fixed weight per changed file
#[must_use]
pub fn impact_score(commit: &CommitRecord) -> u64 {
    commit
        .lines_changed()
        .saturating_add((commit.files_changed as u64).saturating_mul(FILE_WEIGHT))
}

/// A commit with its derived file types and impact score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCommit {
    /// The parsed commit
    #[serde(flatten)]
    pub commit: CommitRecord,
    /// Distinct file extensions touched
    pub file_types: Vec<String>,
    /// Impact score
    pub score: u64,
}

impl From<CommitRecord> for EnrichedCommit {
    fn from(commit: CommitRecord) -> Self {
        let file_types = file_types(&commit.files);
        let score = impact_score(&commit);
        Self {
            commit,
            file_types,
            score,
        }
    }
}

/// Enrich every record, preserving order
#[must_use]
pub fn enrich(commits: Vec<CommitRecord>) -> Vec<EnrichedCommit> {
    commits.into_iter().map(EnrichedCommit::from).collect()
}
