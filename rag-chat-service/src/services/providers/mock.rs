//! Mock provider implementations for testing.

use super::{ChatModel, DocumentRetriever, GenerationParams, ProviderError};
use crate::models::{Message, RetrievedDocument};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock retriever returning a fixed document set.
#[derive(Default)]
pub struct MockRetriever {
    documents: Vec<RetrievedDocument>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockRetriever {
    pub fn new(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    /// A retriever whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentRetriever for MockRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(ProviderError::ApiError(message.clone()));
        }

        Ok(self.documents.iter().take(limit).cloned().collect())
    }
}

/// Mock chat model that echoes its input.
#[derive(Default)]
pub struct MockChatModel {
    failure: Option<String>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs received so far, in call order.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .map(|inputs| inputs.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn converse(
        &self,
        _system: Option<&str>,
        history: &[Message],
        input: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(input.to_string());
        }

        if let Some(message) = &self.failure {
            return Err(ProviderError::ApiError(message.clone()));
        }

        Ok(format!(
            "Mock response for: {} ({} prior messages)",
            input,
            history.len()
        ))
    }
}
