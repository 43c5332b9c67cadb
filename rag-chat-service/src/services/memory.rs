//! Memory-aware generation.
//!
//! Loads the conversation's history, asks the model for the next turn and
//! records the exchange. Nothing is written when generation fails.

use crate::models::Message;
use crate::services::history::{HistoryError, HistoryStore};
use crate::services::providers::{ChatModel, GenerationParams, ProviderError};
use std::sync::Arc;
use thiserror::Error;

/// System preamble for conversational turns.
pub const CONVERSATION_PREAMBLE: &str = "The following is a friendly conversation between a \
human and an AI. The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.";

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Generation(#[from] ProviderError),
}

#[derive(Clone)]
pub struct ConversationMemory {
    store: Arc<dyn HistoryStore>,
    model: Arc<dyn ChatModel>,
    params: GenerationParams,
}

impl ConversationMemory {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        model: Arc<dyn ChatModel>,
        params: GenerationParams,
    ) -> Self {
        Self {
            store,
            model,
            params,
        }
    }

    /// Generate a reply to `model_input` in the context of the stored
    /// history, then persist `user_text` and the reply.
    ///
    /// `model_input` and `user_text` differ only when the caller grounds
    /// the model on a prompt other than the user's own words.
    pub async fn invoke(
        &self,
        session_id: &str,
        model_input: &str,
        user_text: &str,
    ) -> Result<String, MemoryError> {
        let history = self.store.load(session_id).await?;

        tracing::debug!(
            session_id = %session_id,
            history_len = history.len(),
            "Loaded conversation history"
        );

        let reply = self
            .model
            .converse(Some(CONVERSATION_PREAMBLE), &history, model_input, &self.params)
            .await?;

        self.store
            .append(
                session_id,
                &[Message::user(user_text), Message::assistant(reply.as_str())],
            )
            .await?;

        Ok(reply)
    }
}
