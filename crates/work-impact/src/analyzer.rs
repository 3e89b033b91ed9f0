// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Impact analysis: snapshot and profile in, markdown report out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use work_impact_git::{Period, Summary, WorkSnapshot};
use work_impact_llm::{Generator, LlmError};

use crate::prompt::build_impact_prompt;

/// A generated report and the data it was generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    /// When the model answered
    pub generated_at: DateTime<Utc>,
    /// Window of the analysed snapshot
    pub period: Period,
    /// Markdown produced by the model
    pub analysis: String,
    /// Snapshot totals
    pub raw_data: Summary,
}

/// Turns snapshots into reports using any [`Generator`]
#[derive(Debug)]
pub struct ImpactAnalyzer<G> {
    generator: G,
}

impl<G: Generator> ImpactAnalyzer<G> {
    /// Create an analyzer
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Get the generator
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Build the prompt and ask the model for a report
    ///
    /// # Errors
    ///
    /// Returns the generator's `LlmError` unchanged.
    pub async fn analyze_work(
        &self,
        snapshot: &WorkSnapshot,
        profile: Option<&Value>,
    ) -> Result<ImpactReport, LlmError> {
        let prompt = build_impact_prompt(snapshot, profile);
        info!(
            commits = snapshot.commits.len(),
            prompt_chars = prompt.len(),
            "Analyzing work with LLM"
        );
        let analysis = self.generator.generate(&prompt).await?;

        Ok(ImpactReport {
            generated_at: Utc::now(),
            period: snapshot.period.clone(),
            analysis,
            raw_data: snapshot.summary.clone(),
        })
    }
}
