// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Client configuration and API key handling

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::LlmError;
use crate::retry::RetryPolicy;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Model switched to when the resolved one is not found
pub const FALLBACK_MODEL: &str = "models/gemini-2.5-flash";

/// Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Output token budget when the catalog has no limit for the model
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Lower clamp for the output token budget
pub const MIN_OUTPUT_TOKENS: u32 = 256;

/// Upper clamp for the output token budget
pub const MAX_OUTPUT_TOKENS: u32 = 65_536;

/// Keys shorter than this are rejected outright
pub const MIN_API_KEY_LEN: usize = 20;

/// Default per-request timeout; long reports take a while to generate
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// An API key that never prints in full
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate and wrap a key
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidApiKey` if the key is blank or shorter than
    /// [`MIN_API_KEY_LEN`] characters.
    pub fn new(key: impl Into<String>) -> Result<Self, LlmError> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key is required",
            });
        }
        if key.chars().count() < MIN_API_KEY_LEN {
            return Err(LlmError::InvalidApiKey {
                reason: "API key appears to be invalid (too short)",
            });
        }
        Ok(Self(key.to_string()))
    }

    /// The raw key, for the request header only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 8 and last 4 characters
    #[must_use]
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars.iter().take(8).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.redacted()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Everything a [`GeminiClient`](crate::client::GeminiClient) needs
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Credential sent as `x-goog-api-key`
    pub api_key: ApiKey,
    /// Requested model name, resolved against the catalog on first use
    pub model: String,
    /// Output token budget when the catalog does not say
    pub max_output_tokens: u32,
    /// API root; must end with `/`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry behaviour for generation requests
    pub retry: RetryPolicy,
}

impl LlmConfig {
    /// Configuration with defaults for everything but the key
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Url` if the built-in base URL fails to parse.
    pub fn new(api_key: ApiKey) -> Result<Self, LlmError> {
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        })
    }

    /// Set the requested model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the default output token budget
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Point the client at another API root
    ///
    /// A missing trailing slash is added so relative joins keep the path.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Url` if `base_url` is not a valid URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, LlmError> {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = Url::parse(&base_url)?;
        Ok(self)
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Clamp a token budget to what the API accepts
#[must_use]
pub fn clamp_output_tokens(tokens: u32) -> u32 {
    tokens.clamp(MIN_OUTPUT_TOKENS, MAX_OUTPUT_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const KEY: &str = "AIzaSyA1234567890abcdefWXYZ";

    #[test]
    fn test_api_key_validation() {
        assert!(ApiKey::new(KEY).is_ok());
        assert!(matches!(
            ApiKey::new(""),
            Err(LlmError::InvalidApiKey { reason: "API key is required" })
        ));
        assert!(matches!(
            ApiKey::new("   "),
            Err(LlmError::InvalidApiKey { reason: "API key is required" })
        ));
        assert!(matches!(
            ApiKey::new("short-key"),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn test_api_key_exactly_minimum_length() {
        assert!(ApiKey::new("a".repeat(MIN_API_KEY_LEN)).is_ok());
        assert!(ApiKey::new("a".repeat(MIN_API_KEY_LEN - 1)).is_err());
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new(KEY).expect("valid key");
        assert_eq!(key.redacted(), "AIzaSyA1...WXYZ");
        assert_eq!(key.to_string(), "AIzaSyA1...WXYZ");
        let debug = format!("{key:?}");
        assert!(!debug.contains(KEY));
        assert!(debug.contains("AIzaSyA1...WXYZ"));
        assert_eq!(key.expose(), KEY);
    }

    #[test]
    fn test_config_debug_hides_key() {
        let config = LlmConfig::new(ApiKey::new(KEY).expect("valid key")).expect("config");
        assert!(!format!("{config:?}").contains(KEY));
    }

    #[test]
    fn test_config_defaults() {
        let config = LlmConfig::new(ApiKey::new(KEY).expect("valid key")).expect("config");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.max_output_tokens, 8192);
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = LlmConfig::new(ApiKey::new(KEY).expect("valid key"))
            .expect("config")
            .with_base_url("http://localhost:8080/v1beta")
            .expect("valid url");
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/v1beta/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = LlmConfig::new(ApiKey::new(KEY).expect("valid key"))
            .expect("config")
            .with_base_url("not a url");
        assert!(matches!(result, Err(LlmError::Url(_))));
    }

    #[test]
    fn test_clamp_output_tokens() {
        assert_eq!(clamp_output_tokens(0), 256);
        assert_eq!(clamp_output_tokens(8192), 8192);
        assert_eq!(clamp_output_tokens(1_000_000), 65_536);
    }
}
