// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Git log parsing
//!
//! Parses the output of
//! `git log -z --format=%H%n%aI%n%s%n%b --numstat` into [`CommitRecord`]s.
//!
//! The output is split on NUL into fragments. A fragment that starts with a
//! full 40-character hash and a newline opens a commit; the fragments that
//! follow it and look like numstat lines (`<added>\t<deleted>\t<path>`,
//! possibly preceded by a newline) belong to that commit. Anything else is
//! skipped.
//!
//! # Example
//!
//! ```
//! use work_impact_git::parser::parse_log;
//!
//! let raw = "1945ab9c752534e733c38ba0109dc3b741f0a6eb\n\
//!            2026-01-17T02:33:06+00:00\n\
//!            Add parser\n\
//!            \0\n12\t3\tsrc/app.js\0";
//! let commits = parse_log(raw);
//! assert_eq!(commits.len(), 1);
//! assert_eq!(commits[0].lines_added, 12);
//! ```

use std::iter::Peekable;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::commit::{CommitRecord, FileChange};

static HEADER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}\n").expect("header pattern is valid"));

static NUMSTAT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\n?(?:-|[0-9]+)\t(?:-|[0-9]+)\t").expect("numstat start pattern is valid")
});

static NUMSTAT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-|[0-9]+)\t(-|[0-9]+)\t(.+)$").expect("numstat line pattern is valid")
});

/// One commit's worth of raw log text: the header and its numstat fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Hash, date, subject and body lines
    pub header: &'a str,
    /// Numstat fragments that followed the header
    pub numstat: Vec<&'a str>,
}

/// Why a header block did not produce a commit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockRejection {
    /// Fewer than hash, date and subject lines
    #[error("block has {0} line(s), expected at least 3")]
    TooFewLines(usize),

    /// Hash line is not 7-40 hex characters
    #[error("invalid commit hash {0:?}")]
    InvalidHash(String),

    /// Date line is not an ISO 8601 timestamp
    #[error("invalid author date {0:?}")]
    InvalidDate(String),

    /// Subject line is blank
    #[error("empty subject")]
    EmptySubject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    ConsumingNumstat,
}

/// Groups log fragments into [`RawBlock`]s
///
/// In `AwaitingHeader` every fragment that does not open a commit is
/// dropped. In `ConsumingNumstat` fragments are attached to the current block
/// until one fails the numstat pattern; that fragment is left in place and
/// the finished block is emitted.
pub struct BlockTokenizer<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    fragments: Peekable<I>,
    state: State,
    current: Option<RawBlock<'a>>,
}

impl<'a, I> BlockTokenizer<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    /// Create a tokenizer over already-split fragments
    pub fn new(fragments: I) -> Self {
        Self {
            fragments: fragments.peekable(),
            state: State::AwaitingHeader,
            current: None,
        }
    }
}

impl<'a, I> Iterator for BlockTokenizer<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::AwaitingHeader => {
                    let fragment = self.fragments.next()?;
                    if is_header(fragment) {
                        self.current = Some(RawBlock {
                            header: fragment,
                            numstat: Vec::new(),
                        });
                        self.state = State::ConsumingNumstat;
                    } else {
                        debug!(len = fragment.len(), "Skipping fragment outside a commit block");
                    }
                }
                State::ConsumingNumstat => {
                    let next_is_numstat = self.fragments.peek().is_some_and(|f| is_numstat(f));
                    if next_is_numstat {
                        if let (Some(block), Some(fragment)) =
                            (self.current.as_mut(), self.fragments.next())
                        {
                            block.numstat.push(fragment);
                        }
                    } else {
                        self.state = State::AwaitingHeader;
                        if let Some(block) = self.current.take() {
                            return Some(block);
                        }
                    }
                }
            }
        }
    }
}

/// Split raw log output on NUL and group the fragments into blocks
pub fn blocks(raw: &str) -> BlockTokenizer<'_, impl Iterator<Item = &str>> {
    BlockTokenizer::new(raw.split('\0').filter(|f| !f.is_empty()))
}

/// Check whether a fragment opens a commit block
#[must_use]
pub fn is_header(fragment: &str) -> bool {
    HEADER_START.is_match(fragment)
}

/// Check whether a fragment looks like a numstat line
#[must_use]
pub fn is_numstat(fragment: &str) -> bool {
    NUMSTAT_START.is_match(fragment)
}

/// Parse a single numstat fragment
///
/// Returns `None` when the fragment does not have the
/// `<added>\t<deleted>\t<path>` shape.
#[must_use]
pub fn parse_file_change(fragment: &str) -> Option<FileChange> {
    let caps = NUMSTAT_LINE.captures(fragment.trim())?;
    let added = &caps[1];
    let deleted = &caps[2];
    Some(FileChange {
        file: caps[3].to_string(),
        lines_added: parse_count(added),
        lines_deleted: parse_count(deleted),
        is_binary: added == "-" && deleted == "-",
    })
}

// `-` and counts that overflow both record as 0
fn parse_count(field: &str) -> u64 {
    field.parse().unwrap_or(0)
}

/// Parse one header block and its numstat fragments into a commit
///
/// Validation is all-or-nothing for the header. Numstat fragments that do
/// not parse are dropped individually.
///
/// # Errors
///
/// Returns a [`BlockRejection`] describing the first check that failed.
pub fn parse_commit_block(header: &str, numstat: &[&str]) -> Result<CommitRecord, BlockRejection> {
    let lines: Vec<&str> = header.split('\n').collect();
    if lines.len() < 3 {
        return Err(BlockRejection::TooFewLines(lines.len()));
    }

    let hash = lines[0].trim();
    if !CommitRecord::is_valid_hash(hash) {
        return Err(BlockRejection::InvalidHash(hash.to_string()));
    }

    let date_str = lines[1].trim();
    let date = DateTime::parse_from_rfc3339(date_str)
        .map_err(|_| BlockRejection::InvalidDate(date_str.to_string()))?
        .with_timezone(&Utc);

    let subject = lines[2].trim();
    if subject.is_empty() {
        return Err(BlockRejection::EmptySubject);
    }

    let body = lines[3..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let files = numstat
        .iter()
        .filter_map(|fragment| parse_file_change(fragment))
        .collect();

    Ok(CommitRecord::new(
        hash.to_string(),
        date,
        subject.to_string(),
        body,
        files,
    ))
}

/// Parse complete `git log` output into commits
///
/// Never fails: blocks that cannot be parsed are logged at debug level and
/// skipped.
#[must_use]
pub fn parse_log(raw: &str) -> Vec<CommitRecord> {
    let mut commits = Vec::new();
    for block in blocks(raw) {
        match parse_commit_block(block.header, &block.numstat) {
            Ok(commit) => commits.push(commit),
            Err(reason) => {
                debug!(%reason, "Failed to parse commit block");
            }
        }
    }
    commits
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const HASH_A: &str = "1945ab9c752534e733c38ba0109dc3b741f0a6eb";
    const HASH_B: &str = "c460aeb7fb2d109c17e43de0ce681faec0b7374d";

    fn header(hash: &str, subject: &str, body: &str) -> String {
        format!("{hash}\n2026-01-17T02:33:06+01:00\n{subject}\n{body}")
    }

    #[test]
    fn test_numstat_text_file() {
        let change = parse_file_change("12\t3\tsrc/app.js").expect("should parse");
        assert_eq!(change.file, "src/app.js");
        assert_eq!(change.lines_added, 12);
        assert_eq!(change.lines_deleted, 3);
        assert!(!change.is_binary);
    }

    #[test]
    fn test_numstat_binary_file() {
        let change = parse_file_change("-\t-\t img.png").expect("should parse");
        assert_eq!(change.lines_added, 0);
        assert_eq!(change.lines_deleted, 0);
        assert!(change.is_binary);
    }

    #[test]
    fn test_numstat_single_dash_is_not_binary() {
        let change = parse_file_change("-\t4\tdata.bin").expect("should parse");
        assert_eq!(change.lines_added, 0);
        assert_eq!(change.lines_deleted, 4);
        assert!(!change.is_binary);
    }

    #[test]
    fn test_numstat_leading_newline() {
        let change = parse_file_change("\n7\t0\tREADME.md").expect("should parse");
        assert_eq!(change.file, "README.md");
        assert_eq!(change.lines_added, 7);
    }

    #[test]
    fn test_numstat_overflow_counts_as_zero() {
        let change =
            parse_file_change("99999999999999999999999\t1\tbig.txt").expect("should parse");
        assert_eq!(change.lines_added, 0);
        assert_eq!(change.lines_deleted, 1);
    }

    #[test]
    fn test_numstat_rejects_malformed() {
        assert!(parse_file_change("12 3 src/app.js").is_none());
        assert!(parse_file_change("x\t3\tsrc/app.js").is_none());
        assert!(parse_file_change("12\t3\t").is_none());
        assert!(parse_file_change("").is_none());
    }

    #[test]
    fn test_parse_block_full() {
        let header = header(HASH_A, "Add parser", "First line\n\n  Second line\n");
        let commit = parse_commit_block(&header, &["\n12\t3\tsrc/app.js", "-\t-\tlogo.png"])
            .expect("should parse");

        assert_eq!(commit.hash, HASH_A);
        assert_eq!(commit.subject, "Add parser");
        assert_eq!(commit.body, "First line\n  Second line");
        assert_eq!(commit.files_changed, 2);
        assert_eq!(commit.lines_added, 12);
        assert_eq!(commit.lines_deleted, 3);
        assert!(commit.files[1].is_binary);
        assert_eq!(commit.date.to_rfc3339(), "2026-01-17T01:33:06+00:00");
    }

    #[test]
    fn test_parse_block_skips_bad_numstat() {
        let header = header(HASH_A, "Subject", "");
        let commit = parse_commit_block(&header, &["1\t1\ta.rs", "garbage", "2\t2\tb.rs"])
            .expect("should parse");
        assert_eq!(commit.files_changed, 2);
        assert_eq!(commit.lines_added, 3);
        assert_eq!(commit.lines_deleted, 3);
    }

    #[test]
    fn test_parse_block_two_lines_rejected() {
        let result = parse_commit_block(&format!("{HASH_A}\n2026-01-17T02:33:06Z"), &[]);
        assert_eq!(result, Err(BlockRejection::TooFewLines(2)));
    }

    #[test]
    fn test_parse_block_missing_subject_rejected() {
        let result = parse_commit_block(&format!("{HASH_A}\n2026-01-17T02:33:06Z\n"), &[]);
        assert_eq!(result, Err(BlockRejection::EmptySubject));
    }

    #[test]
    fn test_parse_block_invalid_hash_rejected() {
        let result = parse_commit_block(&header("not-a-hash", "Subject", ""), &[]);
        assert!(matches!(result, Err(BlockRejection::InvalidHash(_))));
    }

    #[test]
    fn test_parse_block_invalid_date_rejected() {
        let result = parse_commit_block(&format!("{HASH_A}\nyesterday\nSubject"), &[]);
        assert!(matches!(result, Err(BlockRejection::InvalidDate(_))));
    }

    #[test]
    fn test_parse_block_short_hash_accepted() {
        let commit =
            parse_commit_block(&header("1945AB9", "Subject", ""), &[]).expect("should parse");
        assert_eq!(commit.hash, "1945AB9");
    }

    #[test]
    fn test_parse_block_merge_subject() {
        let commit = parse_commit_block(
            &header(HASH_A, "Merge pull request #4 from foo/bar", ""),
            &[],
        )
        .expect("should parse");
        assert!(commit.is_merge);

        let commit =
            parse_commit_block(&header(HASH_A, "Fix bug in parser", ""), &[]).expect("parse");
        assert!(!commit.is_merge);
    }

    #[test]
    fn test_tokenizer_groups_numstat() {
        let raw = format!(
            "{}\0\n1\t2\ta.rs\0-\t-\tb.png\0\0{}\0\n5\t0\tc.md\0",
            header(HASH_A, "First", ""),
            header(HASH_B, "Second", "")
        );
        let blocks: Vec<RawBlock<'_>> = blocks(&raw).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].numstat, vec!["\n1\t2\ta.rs", "-\t-\tb.png"]);
        assert_eq!(blocks[1].numstat, vec!["\n5\t0\tc.md"]);
    }

    #[test]
    fn test_tokenizer_skips_leading_garbage() {
        let raw = format!("stray text\0{}\0", header(HASH_A, "Only", ""));
        let blocks: Vec<RawBlock<'_>> = blocks(&raw).collect();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].numstat.is_empty());
    }

    #[test]
    fn test_tokenizer_numstat_stops_at_non_matching_fragment() {
        let raw = format!(
            "{}\0\n1\t1\ta.rs\0not numstat\0\n2\t2\torphan.rs\0",
            header(HASH_A, "First", "")
        );
        let blocks: Vec<RawBlock<'_>> = blocks(&raw).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].numstat, vec!["\n1\t1\ta.rs"]);
    }

    #[test]
    fn test_tokenizer_short_hash_does_not_open_block() {
        let raw = "1945ab9\n2026-01-17T02:33:06Z\nSubject\n\0";
        assert_eq!(blocks(raw).count(), 0);
    }

    #[test]
    fn test_parse_log_good_block_then_garbage() {
        let raw = format!(
            "{}\0\n3\t1\tsrc/lib.rs\0\0{HASH_B}\ntruncat",
            header(HASH_A, "Good", "")
        );
        let commits = parse_log(&raw);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, HASH_A);
        assert_eq!(commits[0].lines_added, 3);
    }

    #[test]
    fn test_parse_log_empty_input() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\0\0\0").is_empty());
    }

    #[test]
    fn test_parse_log_is_idempotent() {
        let raw = format!(
            "{}\0\n10\t4\tsrc/a.ts\0-\t-\tlogo.svg\0\0{}\0",
            header(HASH_A, "First", "Body"),
            header(HASH_B, "Second", "")
        );
        assert_eq!(parse_log(&raw), parse_log(&raw));
    }
}
