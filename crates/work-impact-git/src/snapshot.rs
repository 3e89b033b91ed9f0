// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Work snapshots: the persisted result of one collection run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commit::{EnrichedCommit, saturating_sum};

/// Requested time window for a collection run
///
/// `since` takes precedence over `days` when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Look back this many days from today
    pub days: Option<u32>,
    /// Start date, passed to `git log --since`
    pub since: Option<String>,
    /// End date, passed to `git log --until`
    pub until: Option<String>,
}

impl Period {
    /// Window covering the last N days
    #[must_use]
    pub fn last_days(days: u32) -> Self {
        Self {
            days: Some(days),
            ..Default::default()
        }
    }

    /// Window starting at a date
    #[must_use]
    pub fn since(date: impl Into<String>) -> Self {
        Self {
            since: Some(date.into()),
            ..Default::default()
        }
    }

    /// Set the end of the window
    #[must_use]
    pub fn until(mut self, date: impl Into<String>) -> Self {
        self.until = Some(date.into());
        self
    }

    /// Human-readable description of the window
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.since, &self.until) {
            (Some(since), Some(until)) => format!("from {since} to {until}"),
            (Some(since), None) => format!("since {since}"),
            (None, Some(until)) => format!(
                "for last {} days until {until}",
                self.days.unwrap_or(crate::collector::DEFAULT_WINDOW_DAYS)
            ),
            (None, None) => format!(
                "for last {} days",
                self.days.unwrap_or(crate::collector::DEFAULT_WINDOW_DAYS)
            ),
        }
    }
}

/// Aggregate counts over a snapshot's commits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of commits
    pub total_commits: usize,
    /// Lines added across all commits
    pub total_lines_added: u64,
    /// Lines deleted across all commits
    pub total_lines_deleted: u64,
    /// Lines added plus lines deleted
    pub total_lines_changed: u64,
    /// Sum of per-commit file counts
    pub files_changed: u64,
}

impl Summary {
    /// Compute totals over a slice of commits
    #[must_use]
    pub fn from_commits(commits: &[EnrichedCommit]) -> Self {
        let total_lines_added = saturating_sum(commits.iter().map(|c| c.commit.lines_added));
        let total_lines_deleted = saturating_sum(commits.iter().map(|c| c.commit.lines_deleted));
        let files_changed = commits.iter().map(|c| c.commit.files_changed as u64).sum();
        Self {
            total_commits: commits.len(),
            total_lines_added,
            total_lines_deleted,
            total_lines_changed: total_lines_added.saturating_add(total_lines_deleted),
            files_changed,
        }
    }
}

/// Complete result of one collection run
///
/// The summary is computed once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSnapshot {
    /// When the commits were collected
    pub collected_at: DateTime<Utc>,
    /// Requested time window
    pub period: Period,
    /// Enriched commits in git's output order
    pub commits: Vec<EnrichedCommit>,
    /// Totals over `commits`
    pub summary: Summary,
}

impl WorkSnapshot {
    /// Build a snapshot and compute its summary
    #[must_use]
    pub fn new(period: Period, commits: Vec<EnrichedCommit>, collected_at: DateTime<Utc>) -> Self {
        let summary = Summary::from_commits(&commits);
        Self {
            collected_at,
            period,
            commits,
            summary,
        }
    }

    /// Snapshot with no commits
    #[must_use]
    pub fn empty(period: Period, collected_at: DateTime<Utc>) -> Self {
        Self::new(period, Vec::new(), collected_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{CommitRecord, FileChange, enrich};
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    fn commit(hash: &str, files: &[(&str, u64, u64)]) -> CommitRecord {
        CommitRecord::new(
            hash.to_string(),
            Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
            "Subject".to_string(),
            String::new(),
            files
                .iter()
                .map(|(file, added, deleted)| FileChange {
                    file: (*file).to_string(),
                    lines_added: *added,
                    lines_deleted: *deleted,
                    is_binary: false,
                })
                .collect(),
        )
    }

    fn sample_snapshot() -> WorkSnapshot {
        let commits = enrich(vec![
            commit("aaaaaaa", &[("a.rs", 10, 2), ("b.rs", 3, 0)]),
            commit("bbbbbbb", &[("c.md", 1, 7)]),
        ]);
        WorkSnapshot::new(
            Period::last_days(14),
            commits,
            Utc.with_ymd_and_hms(2026, 2, 2, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_summary_totals() {
        let snapshot = sample_snapshot();
        assert_eq!(
            snapshot.summary,
            Summary {
                total_commits: 2,
                total_lines_added: 14,
                total_lines_deleted: 9,
                total_lines_changed: 23,
                files_changed: 3,
            }
        );
    }

    #[test]
    fn test_total_lines_changed_matches_independent_sum() {
        let snapshot = sample_snapshot();
        let added: u64 = snapshot.commits.iter().map(|c| c.commit.lines_added).sum();
        let deleted: u64 = snapshot.commits.iter().map(|c| c.commit.lines_deleted).sum();
        assert_eq!(snapshot.summary.total_lines_changed, added + deleted);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = WorkSnapshot::empty(Period::last_days(30), Utc::now());
        assert_eq!(snapshot.summary, Summary::default());
        assert!(snapshot.commits.is_empty());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert!(json.get("collectedAt").is_some());
        assert_eq!(json["period"]["days"], 14);
        assert!(json["period"]["since"].is_null());
        assert!(json["period"]["until"].is_null());
        assert_eq!(json["summary"]["totalLinesChanged"], 23);
        assert_eq!(json["commits"][0]["score"], 15 + 2 * 200);
        assert_eq!(json["commits"][1]["fileTypes"][0], "md");
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string_pretty(&snapshot).expect("serialize");
        let back: WorkSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(snapshot, back);
    }

    #[test]
    fn test_period_accepts_partial_json() {
        let period: Period = serde_json::from_str(r#"{"days": 30}"#).expect("deserialize");
        assert_eq!(period, Period::last_days(30));
    }

    #[test]
    fn test_period_describe() {
        assert_eq!(Period::default().describe(), "for last 30 days");
        assert_eq!(Period::last_days(7).describe(), "for last 7 days");
        assert_eq!(Period::since("2026-01-01").describe(), "since 2026-01-01");
        assert_eq!(
            Period::since("2026-01-01").until("2026-02-01").describe(),
            "from 2026-01-01 to 2026-02-01"
        );
    }
}
