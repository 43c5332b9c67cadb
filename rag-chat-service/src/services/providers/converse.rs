//! Converse-style chat model provider.
//!
//! Sends the conversation as alternating user/assistant messages to
//! `POST {endpoint}/model/{model_id}/converse` and returns the first text
//! block of the reply. Adjacent turns of the same role are merged into one
//! message, since the runtime requires roles to alternate.

use super::auth::Authentication;
use super::{ChatModel, GenerationParams, ProviderError};
use crate::models::{Message, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Converse provider configuration.
#[derive(Debug, Clone)]
pub struct ConverseConfig {
    pub endpoint: String,
    pub model_id: String,
    pub auth: Authentication,
}

/// Chat model backed by a Converse-compatible runtime.
pub struct ConverseChatModel {
    config: ConverseConfig,
    client: Client,
}

impl ConverseChatModel {
    pub fn new(config: ConverseConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/model/{}/converse",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_id
        )
    }

    fn build_request(
        system: Option<&str>,
        history: &[Message],
        input: &str,
        params: &GenerationParams,
    ) -> ConverseRequest {
        let turns = history
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .chain(std::iter::once((MessageRole::User, input)));

        let mut messages: Vec<ConverseMessage> = Vec::new();
        for (role, text) in turns {
            let block = ContentBlock {
                text: Some(text.to_string()),
            };
            match messages.last_mut() {
                Some(last) if last.role == role => last.content.push(block),
                _ => messages.push(ConverseMessage {
                    role,
                    content: vec![block],
                }),
            }
        }

        ConverseRequest {
            messages,
            system: system.map(|text| {
                vec![ContentBlock {
                    text: Some(text.to_string()),
                }]
            }),
            inference_config: InferenceConfig {
                temperature: params.temperature,
                max_tokens: params.max_tokens,
            },
        }
    }
}

#[async_trait]
impl ChatModel for ConverseChatModel {
    async fn converse(
        &self,
        system: Option<&str>,
        history: &[Message],
        input: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = Self::build_request(system, history, input, params);

        tracing::debug!(
            model = %self.config.model_id,
            history_len = history.len(),
            input_len = input.len(),
            "Sending converse request"
        );

        let url = self.api_url();
        let body = serde_json::to_vec(&request)
            .map_err(|e| ProviderError::ApiError(format!("Failed to encode request: {}", e)))?;

        let response = self
            .config
            .auth
            .authorize(self.client.post(&url), &url, body)
            .await?
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Converse API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ConverseResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(
            stop_reason = ?api_response.stop_reason,
            input_tokens = ?api_response.usage.as_ref().map(|u| u.input_tokens),
            output_tokens = ?api_response.usage.as_ref().map(|u| u.output_tokens),
            "Converse request completed"
        );

        api_response
            .output
            .message
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidResponse("No text in model output".to_string()))
    }
}

// Converse API wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConverseRequest {
    messages: Vec<ConverseMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<Vec<ContentBlock>>,
    inference_config: InferenceConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConverseMessage {
    role: MessageRole,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceConfig {
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConverseResponse {
    output: ConverseOutput,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ConverseOutput {
    message: ConverseMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}
