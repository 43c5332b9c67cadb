//! Query orchestration: retrieval, grounding, memory-aware generation and
//! citation extraction for a single submit-query call.

use crate::models::{Citation, QueryResult, RetrievedDocument};
use crate::services::history::HistoryError;
use crate::services::memory::{ConversationMemory, MemoryError};
use crate::services::providers::{DocumentRetriever, ProviderError};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Separator between documents in the grounding context.
const CONTEXT_SEPARATOR: &str = "\n\n";

const DOCUMENT_PREVIEW_CHARS: usize = 50;
const PROMPT_PREVIEW_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Retrieval failed: {0}")]
    Retrieval(ProviderError),

    #[error("Generation failed: {0}")]
    Generation(ProviderError),

    #[error("History store failed: {0}")]
    History(HistoryError),
}

impl From<MemoryError> for OrchestratorError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::History(e) => OrchestratorError::History(e),
            MemoryError::Generation(e) => OrchestratorError::Generation(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Documents retrieved per query.
    pub number_of_results: usize,

    /// Send the assembled prompt to the model instead of the raw query.
    pub grounded_generation: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            number_of_results: 4,
            grounded_generation: false,
        }
    }
}

pub struct QueryOrchestrator {
    retriever: Arc<dyn DocumentRetriever>,
    memory: ConversationMemory,
    settings: OrchestratorSettings,
}

impl QueryOrchestrator {
    pub fn new(
        retriever: Arc<dyn DocumentRetriever>,
        memory: ConversationMemory,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            retriever,
            memory,
            settings,
        }
    }

    #[tracing::instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn answer(
        &self,
        conversation_id: &str,
        query: &str,
    ) -> Result<QueryResult, OrchestratorError> {
        tracing::info!(query = %query, "Processing query");

        let documents = self
            .retriever
            .retrieve(query, self.settings.number_of_results)
            .await
            .map_err(OrchestratorError::Retrieval)?;

        tracing::info!(count = documents.len(), "Retrieved documents");
        for (i, doc) in documents.iter().enumerate() {
            tracing::debug!(
                index = i + 1,
                metadata = ?doc.metadata,
                preview = %doc.preview(DOCUMENT_PREVIEW_CHARS),
                "Retrieved document"
            );
        }

        let context = build_context(&documents);
        let sources = collect_citations(&documents);
        let prompt = build_prompt(&context, query);

        tracing::debug!(
            prompt_preview = %prompt.chars().take(PROMPT_PREVIEW_CHARS).collect::<String>(),
            grounded = self.settings.grounded_generation,
            "Assembled prompt"
        );

        let model_input = if self.settings.grounded_generation {
            prompt.as_str()
        } else {
            query
        };

        let response = self
            .memory
            .invoke(conversation_id, model_input, query)
            .await?;

        Ok(QueryResult {
            response,
            sources,
            conversation_id: conversation_id.to_string(),
        })
    }
}

/// Concatenate document contents into the grounding context.
pub fn build_context(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Answer the question using the following information:\n\n{}\n\nQuestion: {}\n",
        context, query
    )
}

/// One citation per distinct document title, in retrieval order.
pub fn collect_citations(documents: &[RetrievedDocument]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    documents
        .iter()
        .filter_map(|doc| {
            let title = doc.title();
            seen.insert(title.clone()).then(|| Citation {
                title,
                url: doc.source_url(),
            })
        })
        .collect()
}
