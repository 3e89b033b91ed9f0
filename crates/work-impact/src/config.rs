// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Command-line configuration for work-impact
//!
//! Every option can also come from the environment, so a shell profile or
//! CI job can set the repository, author and API key once.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use work_impact_git::Period;
use work_impact_llm::config::DEFAULT_MODEL;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default reports directory, relative to the working directory
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Work Impact - turn your git history into a performance narrative
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "work-impact")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding work.json, profile.json and models.json
    ///
    /// Defaults to ./data.
    #[arg(long, env = "WORK_IMPACT_DATA", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory generated reports are written to
    ///
    /// Defaults to ./reports.
    #[arg(long, env = "WORK_IMPACT_REPORTS", global = true)]
    pub reports_dir: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,

    /// Debug mode, logs every dropped log block
    #[arg(long, env = "DEBUG", global = true)]
    pub debug: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory with a template profile and empty snapshot
    Init,

    /// Answer a few questions to write your profile
    Setup,

    /// Collect your commits into data/work.json
    ///
    /// Example:
    ///   work-impact collect --repo ~/src/app --author me@example.com --days 14
    Collect(CollectArgs),

    /// Generate an impact report from the collected snapshot
    Analyze(AnalyzeArgs),

    /// List available models with known rate limits and save data/models.json
    ListModels(ApiArgs),
}

/// Options for `collect`
#[derive(Args, Debug, Clone, Default)]
pub struct CollectArgs {
    /// Repository to read
    #[arg(long, env = "REPO_PATH")]
    pub repo: Option<PathBuf>,

    /// Author email to filter by
    #[arg(long, env = "GIT_EMAIL")]
    pub author: Option<String>,

    /// Look back this many days (default 30)
    #[arg(long)]
    pub days: Option<u32>,

    /// Start date, anything `git log --since` accepts; wins over --days
    #[arg(long)]
    pub since: Option<String>,

    /// End date, anything `git log --until` accepts
    #[arg(long)]
    pub until: Option<String>,
}

impl CollectArgs {
    /// The requested window
    #[must_use]
    pub fn period(&self) -> Period {
        Period {
            days: self.days,
            since: self.since.clone(),
            until: self.until.clone(),
        }
    }
}

/// Credentials and endpoint for the model API
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the API root, e.g. for a proxy
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub base_url: Option<String>,
}

/// Options for `analyze`
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// API credentials
    #[command(flatten)]
    pub api: ApiArgs,

    /// Model name; partial names are matched against the catalog
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Output token budget when the catalog has no limit for the model
    #[arg(long, env = "GEMINI_MAX_OUTPUT_TOKENS")]
    pub max_output_tokens: Option<u32>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            api: ApiArgs::default(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: None,
        }
    }
}

impl Config {
    /// Get the data directory, using ./data if not specified
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Get the reports directory, using ./reports if not specified
    #[must_use]
    pub fn reports_path(&self) -> PathBuf {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR))
    }

    /// Validate the configuration for the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data or reports path exists but is not a directory
    /// - `collect` has no repository or author
    /// - `analyze` or `list-models` has no API key
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dir in [self.data_path(), self.reports_path()] {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::NotADirectory(dir));
            }
        }

        match self.command {
            Some(Command::Collect(ref args)) => {
                if args.repo.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
                    return Err(ConfigError::MissingRepository);
                }
                if args.author.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::MissingAuthor);
                }
            }
            Some(Command::Analyze(AnalyzeArgs { ref api, .. }))
            | Some(Command::ListModels(ref api)) => {
                if api.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                    return Err(ConfigError::MissingApiKey);
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Get the log level based on verbose/debug/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose || self.debug {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A directory option points at a file
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No repository for `collect`
    #[error("No repository given. Pass --repo or set REPO_PATH")]
    MissingRepository,

    /// No author for `collect`
    #[error("No author email given. Pass --author or set GIT_EMAIL")]
    MissingAuthor,

    /// No API key for commands that call the model API
    #[error("No API key given. Pass --api-key or set GEMINI_API_KEY")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.command.is_none());
        assert!(config.data_dir.is_none());
        assert!(config.reports_dir.is_none());
        assert!(!config.verbose);
        assert!(!config.quiet);
        assert!(!config.debug);
    }

    #[test]
    fn test_data_path_default() {
        assert_eq!(Config::default().data_path(), PathBuf::from("data"));
        assert_eq!(Config::default().reports_path(), PathBuf::from("reports"));
    }

    #[test]
    fn test_data_path_custom() {
        let custom = PathBuf::from("/custom/data");
        let config = Config {
            data_dir: Some(custom.clone()),
            ..Default::default()
        };
        assert_eq!(config.data_path(), custom);
    }

    #[test]
    fn test_log_level_default() {
        assert_eq!(Config::default().log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_debug_flag() {
        let config = Config {
            debug: true,
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_collect_period() {
        let args = CollectArgs {
            days: Some(7),
            until: Some("2026-02-01".to_string()),
            ..Default::default()
        };
        assert_eq!(args.period(), Period::last_days(7).until("2026-02-01"));
    }

    #[test]
    fn test_validate_collect_requires_repo_and_author() {
        let mut config = Config {
            command: Some(Command::Collect(CollectArgs::default())),
            data_dir: Some(std::env::temp_dir()),
            reports_dir: Some(std::env::temp_dir()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRepository)));

        config.command = Some(Command::Collect(CollectArgs {
            repo: Some(PathBuf::from(".")),
            ..Default::default()
        }));
        assert!(matches!(config.validate(), Err(ConfigError::MissingAuthor)));

        config.command = Some(Command::Collect(CollectArgs {
            repo: Some(PathBuf::from(".")),
            author: Some("dev@example.com".to_string()),
            ..Default::default()
        }));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_analyze_requires_key() {
        let config = Config {
            command: Some(Command::Analyze(AnalyzeArgs::default())),
            data_dir: Some(std::env::temp_dir()),
            reports_dir: Some(std::env::temp_dir()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_validate_data_dir_is_file() {
        let file = std::env::temp_dir().join(format!("work-impact-cfg-{}", std::process::id()));
        std::fs::write(&file, b"x").expect("write temp file");
        let config = Config {
            data_dir: Some(file.clone()),
            ..Default::default()
        };
        let result = config.validate();
        let _ = std::fs::remove_file(&file);
        assert!(matches!(result, Err(ConfigError::NotADirectory(_))));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
