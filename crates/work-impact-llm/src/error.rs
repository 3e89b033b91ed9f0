// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Error types for work-impact-llm

use thiserror::Error;

/// Errors that can occur while talking to the generative model API
#[derive(Debug, Error)]
pub enum LlmError {
    /// API key missing or implausible
    #[error("Invalid API key: {reason}")]
    InvalidApiKey {
        /// Why the key was rejected
        reason: &'static str,
    },

    /// Client configuration could not be applied
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be built
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// The model returned no text
    #[error("Model returned an empty response{}", .reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    EmptyResponse {
        /// Block or finish reason reported by the API, if any
        reason: Option<String>,
    },
}

impl LlmError {
    /// HTTP status for API errors
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Connection or timeout failure, as opposed to a bad response
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout() || e.is_connect())
    }
}
