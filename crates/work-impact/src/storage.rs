// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Flat-file persistence for snapshots, profiles, the model catalog and reports
//!
//! Everything lives in two directories: a data directory with three JSON
//! documents, and a reports directory with one markdown file per run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use work_impact_git::{Period, WorkSnapshot};
use work_impact_llm::ModelInfo;

use crate::profile::template_profile;

/// Snapshot file name
pub const WORK_FILE: &str = "work.json";

/// Profile file name
pub const PROFILE_FILE: &str = "profile.json";

/// Model catalog file name
pub const MODELS_FILE: &str = "models.json";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing failed
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A document exists but is not valid JSON of the expected shape
    #[error("{} is corrupted (invalid JSON): {source}", path.display())]
    Corrupted {
        /// Offending file
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },
}

/// What `init` created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOutcome {
    /// A template profile was written
    pub profile_created: bool,
    /// An empty snapshot was written
    pub work_created: bool,
}

/// The data directory and the documents in it
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Wrap a directory; nothing is created until something is saved
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot document
    #[must_use]
    pub fn work_path(&self) -> PathBuf {
        self.root.join(WORK_FILE)
    }

    /// Path of the profile document
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    /// Path of the model catalog
    #[must_use]
    pub fn models_path(&self) -> PathBuf {
        self.root.join(MODELS_FILE)
    }

    /// Create the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn ensure(&self) -> Result<(), StorageError> {
        create_dir(&self.root)
    }

    /// Replace the snapshot
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn save_snapshot(&self, snapshot: &WorkSnapshot) -> Result<PathBuf, StorageError> {
        let path = self.work_path();
        write_json(&path, snapshot)?;
        info!(path = %path.display(), commits = snapshot.commits.len(), "Saved snapshot");
        Ok(path)
    }

    /// Load the snapshot, or `None` if nothing has been collected yet
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupted` for invalid JSON and
    /// `StorageError::Io` for other read failures.
    pub fn load_snapshot(&self) -> Result<Option<WorkSnapshot>, StorageError> {
        let snapshot = read_json(&self.work_path())?;
        if snapshot.is_none() {
            warn!("{WORK_FILE} not found. Run: work-impact collect");
        }
        Ok(snapshot)
    }

    /// Load the profile, or `None` if setup has not been run
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupted` for invalid JSON and
    /// `StorageError::Io` for other read failures.
    pub fn load_profile(&self) -> Result<Option<Value>, StorageError> {
        let profile = read_json(&self.profile_path())?;
        if profile.is_none() {
            warn!("{PROFILE_FILE} not found. Run: work-impact setup");
        }
        Ok(profile)
    }

    /// Replace the profile
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn save_profile(&self, profile: &Value) -> Result<PathBuf, StorageError> {
        let path = self.profile_path();
        write_json(&path, profile)?;
        Ok(path)
    }

    /// Load the saved model catalog; empty if none was saved
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupted` for invalid JSON and
    /// `StorageError::Io` for other read failures.
    pub fn load_models(&self) -> Result<Vec<ModelInfo>, StorageError> {
        Ok(read_json(&self.models_path())?.unwrap_or_default())
    }

    /// Replace the model catalog
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn save_models(&self, models: &[ModelInfo]) -> Result<PathBuf, StorageError> {
        let path = self.models_path();
        write_json(&path, models)?;
        Ok(path)
    }

    /// Write a template profile and an empty snapshot where missing
    ///
    /// Existing files are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory or files cannot be written.
    pub fn init(&self, now: DateTime<Utc>) -> Result<InitOutcome, StorageError> {
        self.ensure()?;
        let mut outcome = InitOutcome::default();

        if !self.profile_path().exists() {
            self.save_profile(&template_profile())?;
            outcome.profile_created = true;
        }
        if !self.work_path().exists() {
            self.save_snapshot(&WorkSnapshot::empty(Period::last_days(30), now))?;
            outcome.work_created = true;
        }

        Ok(outcome)
    }
}

/// File name for a report generated at `at`: `YYYY-MM-DDTHH-MM-SS-impact.md`
#[must_use]
pub fn report_file_name(at: DateTime<Utc>) -> String {
    format!("{}-impact.md", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write a markdown report into `dir`, creating it if needed
///
/// # Errors
///
/// Returns `StorageError::Io` if the directory or file cannot be written.
pub fn write_report(
    dir: &Path,
    generated_at: DateTime<Utc>,
    markdown: &str,
) -> Result<PathBuf, StorageError> {
    create_dir(dir)?;
    let path = dir.join(report_file_name(generated_at));
    fs::write(&path, markdown).map_err(|source| StorageError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = markdown.len(), "Wrote report");
    Ok(path)
}

fn create_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    debug!(path = %path.display(), bytes = raw.len(), "Read JSON document");
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupted {
            path: path.to_path_buf(),
            source,
        })
}

/// Pretty-print `value` to a sibling temp file, then rename over `path`
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let io_error = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| io_error(io::Error::other(e)))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(io_error)
}
