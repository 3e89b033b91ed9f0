// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! work-impact: git history to impact report
//!
//! Collects one author's commits from a local repository, scores them, and
//! asks Gemini for a narrative performance report.

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use work_impact::commands::{
    gemini_client, llm_config, run_analyze, run_collect, run_init, run_list_models, run_setup,
};
use work_impact::config::{Command, Config};
use work_impact::storage::{DataDir, PROFILE_FILE, WORK_FILE};
use work_impact_llm::GeminiClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    config.validate()?;

    let data = DataDir::new(config.data_path());
    let reports_dir = config.reports_path();
    debug!(
        data_dir = %data.root().display(),
        reports_dir = %reports_dir.display(),
        "Resolved directories"
    );

    let Some(command) = config.command else {
        Config::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Init => {
            let outcome = run_init(&data)?;
            let status = |created| if created { "Created" } else { "Kept existing" };
            println!("{} {}", status(outcome.profile_created), data.profile_path().display());
            println!("{} {}", status(outcome.work_created), data.work_path().display());
            if outcome.profile_created {
                println!("Fill in real details in {PROFILE_FILE} before analyzing");
            }
        }
        Command::Setup => {
            let stdin = io::stdin();
            run_setup(&data, &reports_dir, &mut stdin.lock(), &mut io::stdout())?;
        }
        Command::Collect(args) => {
            let snapshot = run_collect(&data, &args).context("Failed to collect work data")?;
            println!("Found {} commits", snapshot.summary.total_commits);
            println!("Data saved to {}", data.root().join(WORK_FILE).display());
        }
        Command::Analyze(args) => {
            info!("Starting impact analysis");
            eprintln!(
                "Gemini responses arrive in one chunk, so there is no ETA. \
                 Progress updates follow while we wait.\n"
            );
            let client = gemini_client(&data, &args)?;
            let (_, path) = run_analyze(&data, &reports_dir, client, io::stderr()).await?;
            println!("Analysis complete! Report saved to: {}", path.display());
        }
        Command::ListModels(api) => {
            let client = GeminiClient::new(llm_config(&api)?)?;
            let (models, path) = run_list_models(&data, &client)
                .await
                .context("Failed to list models")?;
            for model in &models {
                println!("{}", model.summary_line());
            }
            println!("\nSaved {} models to {}", models.len(), path.display());
        }
    }

    Ok(())
}
