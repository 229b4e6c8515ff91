// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini backend adapter for Hive.
//!
//! Implements [`ModelBackend`] over the Gemini REST `generateContent`
//! endpoint. Only the request/response contract crosses into the rest of
//! the workspace.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use hive_config::model::GeminiConfig;
use hive_core::contract::{Candidate, GenerateRequest, GenerateResponse, Tool};
use hive_core::{AdapterType, HealthStatus, HiveError, ModelBackend, PluginAdapter};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{
    ApiTool, GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleSearch,
    SystemInstruction, TextPart,
};

/// Environment variable consulted last when resolving the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini backend implementing [`ModelBackend`].
pub struct GeminiBackend {
    client: GeminiClient,
}

impl GeminiBackend {
    /// Creates a backend with an already resolved API key.
    pub fn new(config: &GeminiConfig, api_key: &str) -> Result<Self, HiveError> {
        let client = GeminiClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;
        info!(base_url = %config.base_url, "Gemini backend initialized");
        Ok(Self { client })
    }

    /// Creates a backend around an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Resolve the API key.
///
/// Order: `gemini.api_key` in config, then the key stored in settings, then
/// the `GEMINI_API_KEY` environment variable.
pub fn resolve_api_key(
    config_key: Option<&str>,
    stored_key: Option<&str>,
) -> Result<String, HiveError> {
    let env_key = std::env::var(API_KEY_ENV).ok();
    [config_key, stored_key, env_key.as_deref()]
        .into_iter()
        .flatten()
        .find(|k| !k.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            HiveError::Config(format!(
                "Gemini API key not found. Run `hive config set-api-key`, set gemini.api_key in config, or export {API_KEY_ENV}."
            ))
        })
}

fn to_api_request(request: &GenerateRequest) -> GenerateContentRequest<'_> {
    let system_instruction = (!request.system_instruction.is_empty()).then(|| SystemInstruction {
        parts: vec![TextPart {
            text: request.system_instruction.clone(),
        }],
    });
    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|tool| match tool {
                Tool::WebSearch {} => ApiTool {
                    google_search: GoogleSearch {},
                },
            })
            .collect()
    });
    GenerateContentRequest {
        contents: &request.contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
        tools,
    }
}

/// Map the API reply onto the contract: the first candidate's text parts
/// concatenated, plus every candidate's grounding metadata.
fn from_api_response(response: GenerateContentResponse) -> Result<GenerateResponse, HiveError> {
    if response.candidates.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(HiveError::backend(format!("Gemini returned no answer: {reason}")));
    }

    let text: String = response.candidates[0]
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();
    if let Some(reason) = response.candidates[0].finish_reason.as_deref() {
        debug!(finish_reason = reason, chars = text.len(), "candidate finished");
    }

    let candidates = response
        .candidates
        .into_iter()
        .map(|c| Candidate {
            grounding_metadata: c.grounding_metadata,
        })
        .collect();
    Ok(GenerateResponse { text, candidates })
}

#[async_trait]
impl PluginAdapter for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, HiveError> {
        // No probe call; it would spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HiveError> {
        debug!("Gemini backend shutting down");
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, HiveError> {
        let api_request = to_api_request(&request);
        let response = self
            .client
            .generate_content(&request.model, &api_request)
            .await?;
        from_api_response(response)
    }
}
