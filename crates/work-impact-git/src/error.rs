// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Error types for work-impact-git

use thiserror::Error;

/// Errors that can occur while collecting commits
///
/// Malformed log blocks are not errors at this level: the parser drops them
/// and keeps going. Everything here is fatal for a collection run.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository path is empty or does not exist
    #[error("Repository path does not exist: {path}")]
    RepositoryNotFound {
        /// The path that was given
        path: String,
    },

    /// Path exists but is not a git repository
    #[error("Path is not a git repository: {path}")]
    NotARepository {
        /// The path that was given
        path: String,
    },

    /// Author filter is not a plausible email address
    #[error("Invalid author email format: {author:?}")]
    InvalidAuthor {
        /// The author string that was rejected
        author: String,
    },

    /// The git binary could not be run or its pipes failed
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status
    #[error("{command} failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// The command line that failed
        command: String,
        /// Exit code, or -1 when terminated by a signal
        code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// git produced more output than the configured ceiling
    #[error("{command} produced more than {limit} bytes of output")]
    OutputTooLarge {
        /// The command line that was run
        command: String,
        /// Output ceiling in bytes
        limit: usize,
    },
}
