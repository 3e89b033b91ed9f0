// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Gemini `generateContent` client
//!
//! The client resolves the configured model name once, against a local
//! catalog first and the remote listing second, and keeps the result for its
//! own lifetime.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{FALLBACK_MODEL, LlmConfig, clamp_output_tokens};
use crate::error::LlmError;
use crate::models::{ListModelsPage, ModelInfo, find_model};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Models requested per listing page
const LIST_PAGE_SIZE: u32 = 1000;

/// Anything that turns a prompt into text
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// A model name plus the output limit known for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    /// Resource name used in request paths
    pub name: String,
    /// Output token limit from the catalog, if any
    pub output_token_limit: Option<u32>,
}

impl ResolvedModel {
    fn from_catalog(model: &ModelInfo) -> Self {
        Self {
            name: qualify(&model.name),
            output_token_limit: model.output_token_limit,
        }
    }

    fn bare(name: &str) -> Self {
        Self {
            name: qualify(name),
            output_token_limit: None,
        }
    }
}

/// Prefix `models/` unless the name already carries a collection
fn qualify(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("models/{name}")
    }
}

/// HTTP client for the Gemini REST API
#[derive(Debug)]
pub struct GeminiClient {
    config: LlmConfig,
    http: reqwest::Client,
    catalog: Vec<ModelInfo>,
    resolved: Mutex<Option<ResolvedModel>>,
}

impl GeminiClient {
    /// Build a client
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the key cannot be sent as a header, or
    /// `LlmError::Network` if the HTTP client fails to initialise.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut key = HeaderValue::from_str(config.api_key.expose())
            .map_err(|_| LlmError::Config("API key contains invalid characters".to_string()))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http,
            catalog: Vec::new(),
            resolved: Mutex::new(None),
        })
    }

    /// Consult this catalog before the remote listing
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<ModelInfo>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// List every model visible to the key, following pagination
    ///
    /// # Errors
    ///
    /// Returns `LlmError` if any page request fails or cannot be decoded.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.endpoint("models")?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &LIST_PAGE_SIZE.to_string());
                if let Some(ref token) = page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.http.get(url).send().await?;
            let page: ListModelsPage = read_json(response).await?;
            debug!(count = page.models.len(), "Fetched model page");
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    /// Resolve the configured model name, once per client
    ///
    /// Names starting with `models/` are taken as-is. Otherwise the first
    /// catalog entry whose name or display name contains the requested name
    /// wins, then the first such entry in the remote listing, then
    /// `models/<name>`. A failed remote listing is not an error.
    pub async fn resolve_model(&self) -> ResolvedModel {
        let mut cached = self.resolved.lock().await;
        if let Some(ref model) = *cached {
            return model.clone();
        }

        let resolved = self.lookup_model(&self.config.model).await;
        info!(model = %resolved.name, "Resolved model");
        *cached = Some(resolved.clone());
        resolved
    }

    async fn lookup_model(&self, requested: &str) -> ResolvedModel {
        if requested.to_lowercase().starts_with("models/") {
            let limit = self
                .catalog
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(requested))
                .and_then(|m| m.output_token_limit);
            return ResolvedModel {
                name: requested.to_string(),
                output_token_limit: limit,
            };
        }

        if let Some(model) = find_model(&self.catalog, requested) {
            return ResolvedModel::from_catalog(model);
        }

        match self.list_models().await {
            Ok(remote) => {
                if let Some(model) = find_model(&remote, requested) {
                    return ResolvedModel::from_catalog(model);
                }
            }
            Err(e) => debug!(error = %e, "Model listing failed, using name as given"),
        }

        ResolvedModel::bare(requested)
    }

    /// Output token budget for a model
    #[must_use]
    pub fn output_tokens_for(&self, model: &ResolvedModel) -> u32 {
        clamp_output_tokens(
            model
                .output_token_limit
                .unwrap_or(self.config.max_output_tokens),
        )
    }

    /// Generate text for `prompt`, retrying transient failures
    ///
    /// # Errors
    ///
    /// Returns the final `LlmError` once retries are exhausted or on the first
    /// non-retryable failure.
    pub async fn analyze(&self, prompt: &str) -> Result<String, LlmError> {
        let result = self.config.retry.run(|| self.generate_once(prompt)).await;
        if let Err(ref e) = result {
            error!(api_key = %self.config.api_key, error = %e, "LLM request failed");
        }
        result
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, LlmError> {
        let model = self.resolve_model().await;
        let max_tokens = self.output_tokens_for(&model);

        match self.generate_content(&model.name, prompt, max_tokens).await {
            Err(LlmError::Api { status: 404, .. }) if model.name != FALLBACK_MODEL => {
                warn!(
                    model = %model.name,
                    fallback = FALLBACK_MODEL,
                    "Model not found, retrying with fallback"
                );
                let fallback = ResolvedModel::bare(FALLBACK_MODEL);
                *self.resolved.lock().await = Some(fallback.clone());
                let max_tokens = self.output_tokens_for(&fallback);
                self.generate_content(&fallback.name, prompt, max_tokens)
                    .await
            }
            other => other,
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = self.endpoint(&format!("{model}:generateContent"))?;
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { max_output_tokens },
        };

        debug!(model, max_output_tokens, prompt_chars = prompt.len(), "Sending generateContent");
        let response = self.http.post(url).json(&request).send().await?;
        let body: GenerateContentResponse = read_json(response).await?;
        body.into_text()
    }

    fn endpoint(&self, path: &str) -> Result<Url, LlmError> {
        Ok(self.config.base_url.join(path)?)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.analyze(prompt).await
    }
}

/// Decode a success body, or turn an error status into `LlmError::Api`
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, LlmError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: api_error_message(&text),
        });
    }
    Ok(serde_json::from_str(&text)?)
}

/// `error.message` from a Google API error body, else the raw body
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LlmError::EmptyResponse {
                reason: block_reason,
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                reason: candidate.finish_reason.or(block_reason),
            });
        }
        if let Some(reason) = candidate.finish_reason.as_deref()
            && reason != "STOP"
        {
            warn!(finish_reason = reason, "Response may be incomplete");
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("gemini-2.5-flash"), "models/gemini-2.5-flash");
        assert_eq!(qualify("models/gemini-2.5-flash"), "models/gemini-2.5-flash");
        assert_eq!(qualify("tunedModels/mine"), "tunedModels/mine");
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 1024,
            },
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "generationConfig": {"maxOutputTokens": 1024}
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r##"{"candidates": [
                {"content": {"role": "model", "parts": [{"text": "# Report\n"}, {"text": "Done."}]},
                 "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"##,
        )
        .expect("deserialize");
        assert_eq!(body.into_text().expect("text"), "# Report\nDone.");
    }

    #[test]
    fn test_response_blocked_prompt() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
                .expect("deserialize");
        match body.into_text() {
            Err(LlmError::EmptyResponse { reason }) => assert_eq!(reason.as_deref(), Some("SAFETY")),
            other => panic!("Expected EmptyResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_response_candidate_without_text() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#)
                .expect("deserialize");
        match body.into_text() {
            Err(LlmError::EmptyResponse { reason }) => {
                assert_eq!(reason.as_deref(), Some("MAX_TOKENS"))
            }
            other => panic!("Expected EmptyResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 404, "message": "models/nope is not found", "status": "NOT_FOUND"}}"#;
        assert_eq!(api_error_message(body), "models/nope is not found");
        assert_eq!(api_error_message("Service Unavailable\n"), "Service Unavailable");
        assert_eq!(api_error_message(""), "no response body");
    }

    #[test]
    fn test_empty_response_error_display() {
        let err = LlmError::EmptyResponse {
            reason: Some("SAFETY".to_string()),
        };
        assert_eq!(err.to_string(), "Model returned an empty response (SAFETY)");
        let err = LlmError::EmptyResponse { reason: None };
        assert_eq!(err.to_string(), "Model returned an empty response");
    }
}
