//! Knowledge-base retriever.
//!
//! Calls `POST {endpoint}/knowledgebases/{kb_id}/retrieve` with a vector
//! search configuration and maps each retrieval result to a
//! [`RetrievedDocument`].

use super::auth::Authentication;
use super::{DocumentRetriever, ProviderError};
use crate::models::{DocumentLocation, DocumentMetadata, RetrievedDocument};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metadata attribute that carries an explicit citation link.
const SOURCE_URI_ATTRIBUTE: &str = "source_uri";

#[derive(Debug, Clone)]
pub struct KnowledgeBaseConfig {
    pub endpoint: String,
    pub knowledge_base_id: String,
    pub auth: Authentication,
}

pub struct KnowledgeBaseRetriever {
    config: KnowledgeBaseConfig,
    client: Client,
}

impl KnowledgeBaseRetriever {
    pub fn new(config: KnowledgeBaseConfig) -> Result<Self, ProviderError> {
        if config.knowledge_base_id.is_empty() {
            return Err(ProviderError::NotConfigured(
                "knowledge base id is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/knowledgebases/{}/retrieve",
            self.config.endpoint.trim_end_matches('/'),
            self.config.knowledge_base_id
        )
    }
}

#[async_trait]
impl DocumentRetriever for KnowledgeBaseRetriever {
    async fn retrieve(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError> {
        let request = RetrieveRequest {
            retrieval_query: RetrievalQuery {
                text: query.to_string(),
            },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: limit,
                },
            },
        };

        tracing::debug!(
            knowledge_base_id = %self.config.knowledge_base_id,
            limit,
            "Sending retrieve request"
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
                "Retrieve API error {}: {}",
                status, error_text
            )));
        }

        let api_response: RetrieveResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(api_response
            .retrieval_results
            .into_iter()
            .take(limit)
            .map(RetrievalResult::into_document)
            .collect())
    }
}

// Retrieve API wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest {
    retrieval_query: RetrievalQuery,
    retrieval_configuration: RetrievalConfiguration,
}

#[derive(Debug, Serialize)]
struct RetrievalQuery {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration {
    vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration {
    number_of_results: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveResponse {
    #[serde(default)]
    retrieval_results: Vec<RetrievalResult>,
}

#[derive(Debug, Deserialize)]
struct RetrievalResult {
    content: RetrievalContent,
    #[serde(default)]
    location: Option<DocumentLocation>,
    #[serde(default)]
    score: Option<Decimal>,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RetrievalContent {
    #[serde(default)]
    text: String,
}

impl RetrievalResult {
    fn into_document(self) -> RetrievedDocument {
        let source_uri = self
            .metadata
            .get(SOURCE_URI_ATTRIBUTE)
            .and_then(|v| v.as_str())
            .map(str::to_string);

        RetrievedDocument::new(
            self.content.text,
            DocumentMetadata {
                location: self.location,
                source_uri,
                score: self.score,
                attributes: self.metadata,
            },
        )
    }
}
