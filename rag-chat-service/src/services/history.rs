//! Conversation history store abstraction.
//!
//! Messages are kept per conversation id in append order. A batch passed
//! to one `append` call is written atomically. Loading an unknown id yields
//! an empty history and clearing is idempotent.

use crate::models::Message;
use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History store error: {0}")]
    Database(String),

    #[error("Failed to serialize message: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Messages of a conversation in append order.
    async fn load(&self, session_id: &str) -> Result<Vec<Message>, HistoryError>;

    /// Append `messages` in order as a single write.
    async fn append(&self, session_id: &str, messages: &[Message]) -> Result<(), HistoryError>;

    /// Remove every message of a conversation.
    async fn clear(&self, session_id: &str) -> Result<(), HistoryError>;

    async fn health_check(&self) -> Result<(), HistoryError> {
        Ok(())
    }
}

/// Process-local history store for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    sessions: DashMap<String, Vec<Message>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load(&self, session_id: &str) -> Result<Vec<Message>, HistoryError> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|messages| messages.clone())
            .unwrap_or_default())
    }

    async fn append(&self, session_id: &str, messages: &[Message]) -> Result<(), HistoryError> {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), HistoryError> {
        self.sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_unknown_session_is_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.load("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = InMemoryHistoryStore::new();
        store
            .append("s1", &[Message::user("q1"), Message::assistant("a1")])
            .await
            .unwrap();
        store.append("s2", &[Message::user("other")]).await.unwrap();
        store.append("s1", &[Message::user("q2")]).await.unwrap();

        let messages = store.load("s1").await.unwrap();
        assert_eq!(
            messages,
            vec![Message::user("q1"), Message::assistant("a1"), Message::user("q2")]
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = InMemoryHistoryStore::new();
        store.append("s1", &[Message::user("q1")]).await.unwrap();

        store.clear("s1").await.unwrap();
        store.clear("s1").await.unwrap();
        store.clear("never-existed").await.unwrap();

        assert!(store.load("s1").await.unwrap().is_empty());
    }
}
