// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Bounded exponential backoff for model requests

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::LlmError;

/// Statuses worth retrying: rate limiting and transient server failures
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// When and how long to wait before retrying a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single wait
    pub max_delay: Duration,
    /// Growth factor between consecutive waits
    pub multiplier: u32,
    /// HTTP statuses that trigger a retry
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            multiplier: 2,
            retryable_statuses: RETRYABLE_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Total attempts including the first
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry` (0-based)
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Whether an error is transient under this policy
    #[must_use]
    pub fn is_retryable(&self, err: &LlmError) -> bool {
        if err.is_transport() {
            return true;
        }
        err.status()
            .is_some_and(|status| self.retryable_statuses.contains(&status))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once the
    /// attempt ceiling is reached.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if retry < self.max_retries && self.is_retryable(&err) => {
                    let delay = self.delay_for(retry);
                    warn!(
                        attempt = retry + 1,
                        max_attempts = self.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "LLM request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
