// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Commit collection from a local repository
//!
//! Runs `git log` for one author over a time window and hands the output to
//! the [`parser`](crate::parser).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use git2::Repository;
use regex::Regex;
use tracing::{debug, info};

use crate::commit::{CommitRecord, EnrichedCommit, enrich};
use crate::error::GitError;
use crate::parser::parse_log;
use crate::snapshot::Period;

/// Default ceiling on `git log` output (50 MiB)
pub const MAX_LOG_OUTPUT_BYTES: usize = 50 * 1024 * 1024;

/// Window length used when neither `since` nor `days` is given
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Commit format: hash, ISO 8601 author date, subject, body
pub const LOG_FORMAT: &str = "--format=%H%n%aI%n%s%n%b";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Collects one author's commits from one repository
#[derive(Debug, Clone)]
pub struct GitCollector {
    repo_path: PathBuf,
    author_email: String,
    max_output_bytes: usize,
}

impl GitCollector {
    /// Validate the repository and author, then build a collector
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is empty or missing,
    /// `GitError::NotARepository` if it is not a git repository, and
    /// `GitError::InvalidAuthor` if the email is malformed.
    pub fn new(repo_path: impl AsRef<Path>, author_email: &str) -> Result<Self, GitError> {
        let repo_path = repo_path.as_ref();
        validate_repo(repo_path)?;
        validate_author(author_email)?;
        Ok(Self {
            repo_path: repo_path.to_path_buf(),
            author_email: author_email.to_string(),
            max_output_bytes: MAX_LOG_OUTPUT_BYTES,
        })
    }

    /// Override the output ceiling
    #[must_use]
    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    /// Get the repository path
    #[must_use]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Get the author filter
    #[must_use]
    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    /// Build the `git` arguments for a window, relative to `today`
    #[must_use]
    pub fn log_args(&self, period: &Period, today: NaiveDate) -> Vec<String> {
        let mut args = vec![
            "-C".to_string(),
            self.repo_path.display().to_string(),
            "log".to_string(),
            "-z".to_string(),
            format!("--author={}", self.author_email),
            format!("--since={}", start_date(period, today)),
        ];
        if let Some(ref until) = period.until {
            args.push(format!("--until={until}"));
        }
        args.push(LOG_FORMAT.to_string());
        args.push("--numstat".to_string());
        args
    }

    /// Run `git log` for the window and parse the result
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git cannot be run, exits non-zero, or exceeds
    /// the output ceiling.
    pub fn collect(&self, period: &Period) -> Result<Vec<CommitRecord>, GitError> {
        let args = self.log_args(period, Local::now().date_naive());
        let raw = run_git(&args, self.max_output_bytes)?;
        debug!(bytes = raw.len(), "Read git log output");
        let commits = parse_log(&raw);
        info!(commits = commits.len(), "Parsed commits");
        Ok(commits)
    }

    /// Add file types and impact scores
    #[must_use]
    pub fn enrich(&self, commits: Vec<CommitRecord>) -> Vec<EnrichedCommit> {
        enrich(commits)
    }
}

/// First day of the window as passed to `--since`
///
/// An explicit `since` wins; otherwise today minus `days` (default 30).
#[must_use]
pub fn start_date(period: &Period, today: NaiveDate) -> String {
    if let Some(ref since) = period.since {
        return since.clone();
    }
    let days = period.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
        .format("%Y-%m-%d")
        .to_string()
}

fn validate_repo(path: &Path) -> Result<(), GitError> {
    if path.as_os_str().is_empty() || !path.exists() {
        return Err(GitError::RepositoryNotFound {
            path: path.display().to_string(),
        });
    }
    Repository::open(path).map_err(|_| GitError::NotARepository {
        path: path.display().to_string(),
    })?;
    Ok(())
}

fn validate_author(author: &str) -> Result<(), GitError> {
    if EMAIL.is_match(author) {
        Ok(())
    } else {
        Err(GitError::InvalidAuthor {
            author: author.to_string(),
        })
    }
}

/// Run git and capture stdout, failing if it exceeds `limit` bytes
fn run_git(args: &[String], limit: usize) -> Result<String, GitError> {
    let command = format!("git {}", args.join(" "));
    let spawn_error = |source| GitError::Spawn {
        command: command.clone(),
        source,
    };

    let mut child = Command::new("git")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    // Drain stderr on its own thread so a chatty git cannot block on a full pipe
    let stderr_pipe = child.stderr.take();
    let stderr_reader = std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = stderr_pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    });

    let mut stdout = Vec::new();
    if let Some(pipe) = child.stdout.take() {
        pipe.take(limit as u64 + 1)
            .read_to_end(&mut stdout)
            .map_err(spawn_error)?;
    }

    if stdout.len() > limit {
        let _ = child.kill();
        let _ = child.wait();
        let _ = stderr_reader.join();
        return Err(GitError::OutputTooLarge { command, limit });
    }

    let status = child.wait().map_err(spawn_error)?;
    let stderr = stderr_reader.join().unwrap_or_default();

    if !status.success() {
        let stderr = stderr.trim();
        return Err(GitError::CommandFailed {
            command,
            code: status.code().unwrap_or(-1),
            stderr: if stderr.is_empty() {
                "Unknown error".to_string()
            } else {
                stderr.to_string()
            },
        });
    }

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}
