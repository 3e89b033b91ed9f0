// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Model catalog entries and known free-tier quotas

use serde::{Deserialize, Serialize};

/// One entry from the model listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-2.5-flash`
    pub name: String,
    /// Human-readable name
    #[serde(default)]
    pub display_name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Maximum prompt tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<u32>,
    /// Maximum output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<u32>,
    /// API methods the model supports
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
    /// Known free-tier quotas, filled in locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<RateLimits>,
}

impl ModelInfo {
    /// Case-insensitive substring match on name or display name
    #[must_use]
    pub fn matches(&self, requested: &str) -> bool {
        let requested = requested.to_lowercase();
        if requested.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&requested)
            || self.display_name.to_lowercase().contains(&requested)
    }

    /// Attach quotas from the known-limits table
    #[must_use]
    pub fn with_known_limits(mut self) -> Self {
        self.limits = RateLimits::lookup(&self);
        self
    }

    /// One-line listing: name, display name and quotas
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line = self.name.clone();
        if !self.display_name.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.display_name);
        }
        if let Some(limits) = self.limits {
            line.push(' ');
            line.push_str(&limits.to_string());
        }
        line
    }
}

/// Requests per minute, tokens per minute and requests per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    /// Requests per minute
    pub rpm: Option<u32>,
    /// Tokens per minute
    pub tpm: Option<u32>,
    /// Requests per day
    pub rpd: Option<u32>,
}

/// Known free-tier quotas, matched in order against the lowercased name
const KNOWN_LIMITS: &[(&str, Option<u32>, Option<u32>, Option<u32>)] = &[
    ("gemini 2.5 pro", Some(2), Some(125_000), Some(50)),
    ("gemini-2.5-pro", Some(2), Some(125_000), Some(50)),
    ("gemini 2.5 flash-lite", Some(15), Some(250_000), Some(1000)),
    ("gemini-2.5-flash-lite", Some(15), Some(250_000), Some(1000)),
    ("gemini 2.5 flash live", None, Some(1_000_000), None),
    ("gemini 2.5 flash preview native audio", None, Some(500_000), None),
    ("gemini 2.5 flash preview tts", Some(3), Some(10_000), Some(15)),
    ("gemini 2.5 flash", Some(10), Some(250_000), Some(250)),
    ("gemini-2.5-flash", Some(10), Some(250_000), Some(250)),
    ("gemini 2.0 flash-lite", Some(30), Some(1_000_000), Some(200)),
    ("gemini 2.0 flash live", None, Some(1_000_000), None),
    ("gemini 2.0 flash preview image generation", Some(10), Some(200_000), Some(100)),
    ("gemini 2.0 flash", Some(15), Some(1_000_000), Some(200)),
    ("gemma 3", Some(30), Some(15_000), Some(14_400)),
    ("gemini embedding", Some(100), Some(30_000), Some(1000)),
    ("gemini robotics-er 1.5 preview", Some(10), Some(250_000), Some(250)),
    ("gemini 1.5 flash", Some(15), Some(250_000), Some(50)),
];

const EMBEDDING_LIMITS: RateLimits = RateLimits {
    rpm: Some(100),
    tpm: Some(30_000),
    rpd: Some(1000),
};

impl RateLimits {
    /// Look up quotas for a model by name, then display name
    ///
    /// Embedding models not in the table get the embedding quota.
    #[must_use]
    pub fn lookup(model: &ModelInfo) -> Option<Self> {
        let candidates = [model.name.to_lowercase(), model.display_name.to_lowercase()];
        for name in candidates.iter().filter(|n| !n.is_empty()) {
            let found = KNOWN_LIMITS
                .iter()
                .find(|(pattern, ..)| name.contains(pattern));
            if let Some(&(_, rpm, tpm, rpd)) = found {
                return Some(Self { rpm, tpm, rpd });
            }
        }
        model
            .supported_generation_methods
            .iter()
            .any(|m| m.to_lowercase().contains("embed"))
            .then_some(EMBEDDING_LIMITS)
    }
}

impl std::fmt::Display for RateLimits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        write!(
            f,
            "[RPM:{} TPM:{} RPD:{}]",
            show(self.rpm),
            show(self.tpm),
            show(self.rpd)
        )
    }
}

/// First entry matching `requested`
#[must_use]
pub fn find_model<'a>(models: &'a [ModelInfo], requested: &str) -> Option<&'a ModelInfo> {
    models.iter().find(|m| m.matches(requested))
}

/// One page of `GET models`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListModelsPage {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
