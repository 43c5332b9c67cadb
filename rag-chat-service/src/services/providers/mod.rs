//! External AI service abstractions and implementations.
//!
//! Retrieval and generation sit behind traits so the orchestrator can be
//! wired with the managed services in production and with mocks in tests.

pub mod auth;
pub mod converse;
pub mod knowledge_base;
pub mod mock;

use crate::models::{Message, RetrievedDocument};
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request signing failed: {0}")]
    Signing(String),
}

/// Generation parameters sent with every model call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 1000,
        }
    }
}

/// Document retrieval service (a knowledge base).
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Return up to `limit` documents ranked by relevance to `query`.
    async fn retrieve(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError>;
}

/// Text generation service.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate the next assistant turn given prior turns and a new user turn.
    async fn converse(
        &self,
        system: Option<&str>,
        history: &[Message],
        input: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}
