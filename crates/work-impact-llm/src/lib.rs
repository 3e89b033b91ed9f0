// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! work-impact-llm: Gemini client for impact report generation
//!
//! This crate wraps the Gemini REST API with the pieces the report generator
//! needs:
//!
//! - An explicit [`LlmConfig`] whose API key never prints in full
//! - Bounded exponential backoff for rate limits and transient failures
//! - Model name resolution against a local catalog and the remote listing
//! - A [`Generator`] trait so callers can swap in a stub
//!
//! # Example
//!
//! ```no_run
//! use work_impact_llm::prelude::*;
//!
//! # async fn run() -> Result<(), LlmError> {
//! let config = LlmConfig::new(ApiKey::new("AIzaSy-your-key-goes-here")?)?
//!     .with_model("gemini-2.5-flash");
//! let client = GeminiClient::new(config)?;
//! let text = client.generate("Summarise my week").await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;

pub use client::{GeminiClient, Generator, ResolvedModel};
pub use config::{ApiKey, LlmConfig};
pub use error::LlmError;
pub use models::{ModelInfo, RateLimits};
pub use retry::RetryPolicy;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{GeminiClient, Generator};
    pub use crate::config::{ApiKey, LlmConfig};
    pub use crate::error::LlmError;
    pub use crate::models::ModelInfo;
    pub use crate::retry::RetryPolicy;
}
