// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Prompt construction for impact analysis
//!
//! The prompt carries the profile, the snapshot totals and the highest-scoring
//! commits, followed by fixed instructions for the report layout.

use std::fmt::Write;

use serde_json::Value;
use work_impact_git::{EnrichedCommit, Period, WorkSnapshot};

/// Commits included in full
pub const TOP_COMMITS: usize = 20;

/// Commit bodies longer than this many characters are clipped
pub const BODY_CLIP_CHARS: usize = 400;

const MISSING_PROFILE: &str = "{\n  \"note\": \"profile.json not configured; update data/profile.json for richer context\"\n}";

const INSTRUCTIONS: &str = r#"## Your Task
You are an experienced engineering manager. Use only the evidence provided (commits, profile, summary stats). Do not invent ticket numbers, external approvals, or productivity metrics that are not explicitly supplied. Base every claim on the observable data.

## Required Analysis

### 0. Highlights & Milestones
Write 3-5 bullets capturing the standout work, referencing facts above (e.g., scope, cadence, measurable impact).

### 1. Executive Summary
2-3 sentences describing the overall impact and themes.

### 2. Key Achievements
List 3-5 accomplishments. For each: what changed, why it matters, observable effort metrics (lines/files/commit counts), and skills demonstrated. Tie statements to specific commits when possible.

### 3. Delivery Patterns
Discuss cadence, workload mix, and any notable swings. Use the provided totals/averages and commit-level evidence.

### 4. Skills Demonstrated
Enumerate technical and collaboration skills that can be defended with the commit evidence.

### 5. Growth Indicators
Explain strengths, areas of momentum, and readiness for broader scope using only grounded observations.

### 6. Performance Review Talking Points
Provide 3-5 bullet points framed for a performance review. Anchor each to measurable outcomes.

### 7. "Should I Feel Proud?" Assessment
Categorize the period (Below Average / Average / Above Average / Exceptional) with justification derived from the data.

### 8. Emotional Validation
Write 4-6 sentences acknowledging effort and impact. Keep the tone sincere and evidence-based.

### 9. Opportunities & Next Steps
Offer 4-5 six-month recommendations that a senior developer could pursue. Each item must:
- Start with the skill or signal being strengthened.
- Cite the relevant commit evidence.
- Outline concrete actions and checkpoints.
- Define success metrics or artifacts to collect.

### CV Highlights (copy-paste ready)
Generate 6 resume bullets written for a senior-level engineer. Each bullet should:
- Read like a high-level accomplishment, not a task log.
- Emphasize strategic leadership, technical authority, and cross-team or organizational reach.
- Focus on meaningful business or user outcomes (reliability gains, customer impact, risk reduction) rather than code volume.
- Showcase ownership of direction, standards, and collaboration that moved the company forward.
- Never mention line counts, file counts, commit totals, or ticket IDs. If quantitative evidence exists, use business-facing metrics (e.g., user reach, latency improvements); otherwise, describe the impact qualitatively.
- Spotlight how the work advanced product strategy, enabled partner success, or hardened operational resilience; keep the framing senior-level and forward-looking.
Keep the tone concise, confident, and outcome-oriented.

## Output Rules
Return a single markdown document following the section order above. Do not wrap the response in additional fences or commentary. Base every insight on the provided data; flag assumptions if you must make any.
"#;

/// Build the analysis prompt for a snapshot and optional profile
#[must_use]
pub fn build_impact_prompt(snapshot: &WorkSnapshot, profile: Option<&Value>) -> String {
    let mut commits: Vec<&EnrichedCommit> = snapshot.commits.iter().collect();
    commits.sort_by(|a, b| b.score.cmp(&a.score));
    let top = &commits[..commits.len().min(TOP_COMMITS)];
    let omitted = commits.len() - top.len();

    let summary = &snapshot.summary;
    let total_commits = if summary.total_commits == 0 {
        commits.len()
    } else {
        summary.total_commits
    };

    let profile_section = profile
        .and_then(|p| serde_json::to_string_pretty(p).ok())
        .unwrap_or_else(|| MISSING_PROFILE.to_string());

    let commit_section = top
        .iter()
        .enumerate()
        .map(|(i, commit)| format_commit(i + 1, commit))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "# Developer Impact Analysis

## Developer Profile
{profile_section}

## Work Snapshot
- **Period**: {period}
- **Total Commits**: {total_commits}
- **Lines Added**: {added}
- **Lines Deleted**: {deleted}
- **Lines Changed**: {changed}
- **Files Touched**: {files}
- **Average Lines per Commit**: {avg_lines}
- **Average Files per Commit**: {avg_files}

---

## Top {top_count} Commits By Impact Score
{commit_section}
",
        period = period_label(&snapshot.period),
        added = summary.total_lines_added,
        deleted = summary.total_lines_deleted,
        changed = summary.total_lines_changed,
        files = summary.files_changed,
        avg_lines = average_lines(summary.total_lines_changed, commits.len()),
        avg_files = average_files(summary.files_changed, commits.len()),
        top_count = top.len(),
    );
    if omitted > 0 {
        let _ = write!(
            prompt,
            "\n*Note: {omitted} additional commits omitted for brevity.*\n"
        );
    }
    prompt.push_str("\n\n---\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt
}

fn format_commit(rank: usize, commit: &EnrichedCommit) -> String {
    let record = &commit.commit;
    let subject = if record.subject.is_empty() {
        "(no subject)"
    } else {
        &record.subject
    };
    let file_types = if commit.file_types.is_empty() {
        "n/a".to_string()
    } else {
        commit.file_types.join(", ")
    };

    format!(
        "### {rank}. {subject}

- Hash: {hash}
- Date: {date}
- Lines: +{added} / -{deleted}
- Files Changed: {files}
- File Types: {file_types}
- Merge Commit: {merge}

{body}",
        hash = record.hash,
        date = record.date.format("%Y-%m-%d"),
        added = record.lines_added,
        deleted = record.lines_deleted,
        files = record.files_changed,
        merge = if record.is_merge { "yes" } else { "no" },
        body = clip_body(&record.body),
    )
}

/// `Since <date>`, `Last <n> days` or `Custom range`
#[must_use]
pub fn period_label(period: &Period) -> String {
    match (&period.since, period.days) {
        (Some(since), _) if !since.is_empty() => format!("Since {since}"),
        (_, Some(days)) if days > 0 => format!("Last {days} days"),
        _ => "Custom range".to_string(),
    }
}

/// Clip to [`BODY_CLIP_CHARS`] characters, marking the cut with `...`
#[must_use]
pub fn clip_body(body: &str) -> String {
    match body.char_indices().nth(BODY_CLIP_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Lines changed per commit, rounded half up
fn average_lines(total_lines: u64, commits: usize) -> u64 {
    if commits == 0 {
        return 0;
    }
    let n = commits as u128;
    ((u128::from(total_lines) * 2 + n) / (2 * n)) as u64
}

/// Files per commit with one decimal, rounded half up
fn average_files(total_files: u64, commits: usize) -> String {
    if commits == 0 {
        return "0.0".to_string();
    }
    let n = commits as u128;
    let tenths = (u128::from(total_files) * 20 + n) / (2 * n);
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use similar_asserts::assert_eq;
    use work_impact_git::commit::enrich;
    use work_impact_git::{CommitRecord, FileChange};

    fn commit(n: usize, subject: &str, added: u64, files: usize) -> CommitRecord {
        CommitRecord::new(
            format!("{n:07x}abc"),
            Utc.with_ymd_and_hms(2026, 2, 1, 23, 30, 0).unwrap(),
            subject.to_string(),
            String::new(),
            (0..files)
                .map(|f| FileChange {
                    file: format!("src/file{f}.rs"),
                    lines_added: if f == 0 { added } else { 0 },
                    lines_deleted: 0,
                    is_binary: false,
                })
                .collect(),
        )
    }

    fn snapshot(commits: Vec<CommitRecord>, period: Period) -> WorkSnapshot {
        WorkSnapshot::new(
            period,
            enrich(commits),
            Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_commits_ordered_by_score() {
        let snap = snapshot(
            vec![
                commit(1, "Small fix", 3, 1),
                commit(2, "Big feature", 50, 3),
                commit(3, "Medium change", 90, 1),
            ],
            Period::last_days(30),
        );
        let prompt = build_impact_prompt(&snap, None);

        let big = prompt.find("### 1. Big feature").expect("big first");
        let medium = prompt.find("### 2. Medium change").expect("medium second");
        let small = prompt.find("### 3. Small fix").expect("small third");
        assert!(big < medium && medium < small);
        assert!(prompt.contains("## Top 3 Commits By Impact Score"));
        assert!(!prompt.contains("omitted for brevity"));
    }

    #[test]
    fn test_equal_scores_keep_original_order() {
        let snap = snapshot(
            vec![commit(1, "First", 5, 1), commit(2, "Second", 5, 1)],
            Period::last_days(30),
        );
        let prompt = build_impact_prompt(&snap, None);
        assert!(prompt.contains("### 1. First"));
        assert!(prompt.contains("### 2. Second"));
    }

    #[test]
    fn test_top_commits_truncated() {
        let commits = (0..25).map(|i| commit(i, &format!("Commit {i}"), i as u64, 1)).collect();
        let snap = snapshot(commits, Period::last_days(30));
        let prompt = build_impact_prompt(&snap, None);

        assert!(prompt.contains("## Top 20 Commits By Impact Score"));
        assert!(prompt.contains("### 1. Commit 24\n"));
        assert!(prompt.contains("### 20. Commit 5\n"));
        assert!(!prompt.contains("Commit 4\n"));
        assert!(prompt.contains("*Note: 5 additional commits omitted for brevity.*"));
        assert!(prompt.contains("- **Total Commits**: 25"));
    }

    #[test]
    fn test_commit_details() {
        let mut record = commit(7, "Add parser", 12, 2);
        record.body = "Handles NUL-delimited input.".to_string();
        let snap = snapshot(vec![record], Period::since("2026-01-01"));
        let prompt = build_impact_prompt(&snap, None);

        assert!(prompt.contains(
            "### 1. Add parser

- Hash: 0000007abc
- Date: 2026-02-01
- Lines: +12 / -0
- Files Changed: 2
- File Types: rs
- Merge Commit: no

Handles NUL-delimited input."
        ));
        assert!(prompt.contains("- **Period**: Since 2026-01-01"));
    }

    #[test]
    fn test_summary_and_averages() {
        let snap = snapshot(
            vec![commit(1, "A", 10, 1), commit(2, "B", 5, 2), commit(3, "C", 0, 2)],
            Period::last_days(14),
        );
        let prompt = build_impact_prompt(&snap, None);
        assert!(prompt.contains("- **Period**: Last 14 days"));
        assert!(prompt.contains("- **Lines Changed**: 15"));
        assert!(prompt.contains("- **Files Touched**: 5"));
        assert!(prompt.contains("- **Average Lines per Commit**: 5"));
        assert!(prompt.contains("- **Average Files per Commit**: 1.7"));
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = snapshot(Vec::new(), Period::default());
        let prompt = build_impact_prompt(&snap, None);
        assert!(prompt.contains("- **Period**: Custom range"));
        assert!(prompt.contains("- **Total Commits**: 0"));
        assert!(prompt.contains("- **Average Lines per Commit**: 0"));
        assert!(prompt.contains("- **Average Files per Commit**: 0.0"));
        assert!(prompt.contains("## Top 0 Commits By Impact Score"));
        assert!(prompt.ends_with(INSTRUCTIONS));
    }

    #[test]
    fn test_profile_rendering() {
        let snap = snapshot(Vec::new(), Period::last_days(30));
        let without = build_impact_prompt(&snap, None);
        assert!(without.contains("\"note\": \"profile.json not configured"));

        let profile = serde_json::json!({"role": "Staff Engineer"});
        let with = build_impact_prompt(&snap, Some(&profile));
        assert!(with.contains("## Developer Profile\n{\n  \"role\": \"Staff Engineer\"\n}"));
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(&Period::last_days(7)), "Last 7 days");
        assert_eq!(period_label(&Period::last_days(0)), "Custom range");
        assert_eq!(
            period_label(&Period::since("2026-01-01").until("2026-02-01")),
            "Since 2026-01-01"
        );
        assert_eq!(
            period_label(&Period {
                days: Some(7),
                since: Some("2026-01-01".to_string()),
                until: None
            }),
            "Since 2026-01-01"
        );
    }

    #[test]
    fn test_clip_body() {
        assert_eq!(clip_body("short"), "short");
        let exact = "x".repeat(BODY_CLIP_CHARS);
        assert_eq!(clip_body(&exact), exact);
        let long = "é".repeat(BODY_CLIP_CHARS + 1);
        let clipped = clip_body(&long);
        assert_eq!(clipped.chars().count(), BODY_CLIP_CHARS + 3);
        assert!(clipped.ends_with("é..."));
    }

    #[test]
    fn test_averages_round_half_up() {
        assert_eq!(average_lines(5, 2), 3);
        assert_eq!(average_lines(4, 3), 1);
        assert_eq!(average_files(1, 4), "0.3");
        assert_eq!(average_files(7, 2), "3.5");
    }
}
