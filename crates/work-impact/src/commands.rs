// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Command implementations
//!
//! Each command takes its inputs explicitly and returns what it produced, so
//! `main` only has to print results and tests can drive commands directly.
//!
//! # Example
//!
//! ```no_run
//! use work_impact::commands::run_collect;
//! use work_impact::config::CollectArgs;
//! use work_impact::storage::DataDir;
//!
//! let data = DataDir::new("data");
//! let args = CollectArgs {
//!     repo: Some("/path/to/repo".into()),
//!     author: Some("me@example.com".to_string()),
//!     days: Some(14),
//!     ..Default::default()
//! };
//! let snapshot = run_collect(&data, &args).expect("collect");
//! println!("Collected {} commits", snapshot.summary.total_commits);
//! ```

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use work_impact_git::{GitCollector, WorkSnapshot};
use work_impact_llm::{ApiKey, GeminiClient, Generator, LlmConfig, ModelInfo};

use crate::analyzer::{ImpactAnalyzer, ImpactReport};
use crate::config::{AnalyzeArgs, ApiArgs, CollectArgs, ConfigError};
use crate::profile::{ask_setup, profile_from_answers};
use crate::progress::{TICK_INTERVAL, with_elapsed_ticker};
use crate::storage::{DataDir, InitOutcome, StorageError, write_report};

// ============================================================================
// Error Types
// ============================================================================

/// Command errors
#[derive(Debug, Error)]
pub enum CommandError {
    /// Missing or invalid options
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Data or report files
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Collecting from git
    #[error("Git error: {0}")]
    Git(#[from] work_impact_git::GitError),

    /// Talking to the model API
    #[error("LLM error: {0}")]
    Llm(#[from] work_impact_llm::LlmError),

    /// Terminal I/O during setup
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `analyze` before any `collect`
    #[error("No work data found at {}. Run `work-impact collect` first", path.display())]
    NoWorkData {
        /// Where the snapshot was expected
        path: PathBuf,
    },
}

// ============================================================================
// init / setup
// ============================================================================

/// Create the data directory with template documents
///
/// # Errors
///
/// Returns `CommandError::Storage` if the files cannot be written.
pub fn run_init(data: &DataDir) -> Result<InitOutcome, CommandError> {
    let outcome = data.init(Utc::now())?;
    info!(
        profile_created = outcome.profile_created,
        work_created = outcome.work_created,
        "Init complete"
    );
    Ok(outcome)
}

/// Ask the setup questions and write the profile
///
/// The profile is always replaced; an empty snapshot is written only if none
/// exists. Both directories are created.
///
/// # Errors
///
/// Returns `CommandError::Io` for terminal failures and
/// `CommandError::Storage` for file failures.
pub fn run_setup<R: BufRead, W: Write>(
    data: &DataDir,
    reports_dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, CommandError> {
    data.ensure()?;
    std::fs::create_dir_all(reports_dir).map_err(|source| StorageError::Io {
        path: reports_dir.to_path_buf(),
        source,
    })?;

    writeln!(output, "Work Impact Analysis Setup\n")?;
    let answers = ask_setup(input, output)?;
    let path = data.save_profile(&profile_from_answers(&answers))?;
    data.init(Utc::now())?;

    writeln!(output, "\nSetup complete! Profile saved to {}", path.display())?;
    writeln!(output, "\nSet these before collecting:")?;
    writeln!(output, "  export GIT_EMAIL={}", answers.git_email)?;
    writeln!(output, "  export REPO_PATH={}", answers.repo_path)?;
    writeln!(output, "  export GEMINI_API_KEY=<key from https://aistudio.google.com/app/apikey>")?;
    writeln!(output, "\nNext steps:\n1. Run: work-impact collect\n2. Run: work-impact analyze")?;
    Ok(path)
}

// ============================================================================
// collect
// ============================================================================

/// Collect commits for the configured window and replace the snapshot
///
/// # Errors
///
/// Returns `CommandError::Config` if the repository or author is missing,
/// `CommandError::Git` if validation or collection fails, and
/// `CommandError::Storage` if the snapshot cannot be saved.
pub fn run_collect(data: &DataDir, args: &CollectArgs) -> Result<WorkSnapshot, CommandError> {
    let repo = args.repo.as_ref().ok_or(ConfigError::MissingRepository)?;
    let author = args.author.as_deref().ok_or(ConfigError::MissingAuthor)?;
    let period = args.period();

    let collector = GitCollector::new(repo, author)?;
    info!(
        repo = %collector.repo_path().display(),
        author = collector.author_email(),
        "Collecting work data {}",
        period.describe()
    );

    let commits = collector.collect(&period)?;
    let snapshot = WorkSnapshot::new(period, collector.enrich(commits), Utc::now());
    data.save_snapshot(&snapshot)?;
    Ok(snapshot)
}

// ============================================================================
// analyze / list-models
// ============================================================================

/// Client configuration from command-line credentials
///
/// # Errors
///
/// Returns `CommandError::Config` if no key was given and
/// `CommandError::Llm` if the key or base URL is invalid.
pub fn llm_config(api: &ApiArgs) -> Result<LlmConfig, CommandError> {
    let key = api.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
    let mut config = LlmConfig::new(ApiKey::new(key)?)?;
    if let Some(ref base_url) = api.base_url {
        config = config.with_base_url(base_url)?;
    }
    Ok(config)
}

/// Build a Gemini client for `analyze`, seeded with the saved catalog
///
/// A corrupt catalog is logged and ignored.
///
/// # Errors
///
/// Returns `CommandError` if the configuration is invalid.
pub fn gemini_client(data: &DataDir, args: &AnalyzeArgs) -> Result<GeminiClient, CommandError> {
    let mut config = llm_config(&args.api)?.with_model(args.model.clone());
    if let Some(tokens) = args.max_output_tokens {
        config = config.with_max_output_tokens(tokens);
    }

    let catalog = data.load_models().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable model catalog");
        Vec::new()
    });
    Ok(GeminiClient::new(config)?.with_catalog(catalog))
}

/// Generate a report from the saved snapshot and write it to `reports_dir`
///
/// `progress` receives the elapsed-time ticker.
///
/// # Errors
///
/// Returns `CommandError::NoWorkData` if nothing was collected, and the
/// generator's or storage's error otherwise.
pub async fn run_analyze<G: Generator, W: Write>(
    data: &DataDir,
    reports_dir: &Path,
    generator: G,
    progress: W,
) -> Result<(ImpactReport, PathBuf), CommandError> {
    let snapshot = data.load_snapshot()?.ok_or_else(|| CommandError::NoWorkData {
        path: data.work_path(),
    })?;
    let profile = data.load_profile()?;

    let analyzer = ImpactAnalyzer::new(generator);
    let report = with_elapsed_ticker(
        analyzer.analyze_work(&snapshot, profile.as_ref()),
        TICK_INTERVAL,
        progress,
    )
    .await?;

    let path = write_report(reports_dir, report.generated_at, &report.analysis)?;
    Ok((report, path))
}

/// Fetch the model listing, attach known quotas and save the catalog
///
/// # Errors
///
/// Returns `CommandError::Llm` if listing fails and
/// `CommandError::Storage` if the catalog cannot be saved.
pub async fn run_list_models(
    data: &DataDir,
    client: &GeminiClient,
) -> Result<(Vec<ModelInfo>, PathBuf), CommandError> {
    let models: Vec<ModelInfo> = client
        .list_models()
        .await?
        .into_iter()
        .map(ModelInfo::with_known_limits)
        .collect();
    let path = data.save_models(&models)?;
    info!(count = models.len(), path = %path.display(), "Saved model catalog");
    Ok((models, path))
}
