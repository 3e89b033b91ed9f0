// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! work-impact-git: Commit collection and impact scoring
//!
//! This library crate runs `git log` for one author, parses the NUL-delimited
//! output into commit records, and scores each commit by impact.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use work_impact_git::{GitCollector, Period, WorkSnapshot};
//!
//! let collector = GitCollector::new(".", "dev@example.com").expect("valid repo");
//! let period = Period::last_days(14);
//! let commits = collector.collect(&period).expect("collect commits");
//! let snapshot = WorkSnapshot::new(period, collector.enrich(commits), chrono::Utc::now());
//!
//! for c in &snapshot.commits {
//!     println!("{} {} (score {})", c.commit.short_hash(), c.commit.subject, c.score);
//! }
//! ```

pub mod collector;
pub mod commit;
pub mod error;
pub mod parser;
pub mod snapshot;

pub use collector::GitCollector;
pub use commit::{CommitRecord, EnrichedCommit, FileChange};
pub use error::GitError;
pub use parser::parse_log;
pub use snapshot::{Period, Summary, WorkSnapshot};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::collector::GitCollector;
    pub use crate::commit::{CommitRecord, EnrichedCommit, FileChange};
    pub use crate::error::GitError;
    pub use crate::snapshot::{Period, Summary, WorkSnapshot};
}
