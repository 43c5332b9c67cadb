//! MongoDB-backed conversation history.
//!
//! One document per conversation:
//! `{ "SessionId": <id>, "History": [ { "type": "human" | "ai", "data": { "content": ... } } ] }`.
//! A turn's messages are pushed with one `$push`/`$each` update.

use crate::models::{Message, StoredMessage};
use crate::services::history::{HistoryError, HistoryStore};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{IndexOptions, UpdateOptions},
    Client as MongoClient, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// Stored conversation document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(rename = "SessionId")]
    pub session_id: String,

    #[serde(rename = "History", default)]
    pub history: Vec<StoredMessage>,
}

#[derive(Clone)]
pub struct MongoHistoryStore {
    client: MongoClient,
    collection: Collection<HistoryDocument>,
}

impl MongoHistoryStore {
    pub async fn connect(uri: &str, database: &str, table_name: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let collection = client.database(database).collection(table_name);
        tracing::info!(
            database = %database,
            collection = %table_name,
            "Successfully connected to MongoDB history store"
        );
        Ok(Self { client, collection })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let session_id_index = IndexModel::builder()
            .keys(doc! { "SessionId": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection
            .create_index(session_id_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create SessionId index: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("History store indexes ready");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MongoHistoryStore {
    async fn load(&self, session_id: &str) -> Result<Vec<Message>, HistoryError> {
        let document = self
            .collection
            .find_one(doc! { "SessionId": session_id }, None)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session_id, "Failed to load history: {}", e);
                HistoryError::Database(e.to_string())
            })?;

        Ok(document
            .map(|d| {
                d.history
                    .into_iter()
                    .filter_map(StoredMessage::into_message)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn append(&self, session_id: &str, messages: &[Message]) -> Result<(), HistoryError> {
        let stored = messages
            .iter()
            .map(|m| mongodb::bson::to_bson(&StoredMessage::from(m)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::error!("Failed to serialize message: {}", e);
                HistoryError::Serialization(e.to_string())
            })?;

        self.collection
            .update_one(
                doc! { "SessionId": session_id },
                doc! {
                    "$push": { "History": { "$each": stored } },
                    "$set": { "UpdatedAt": BsonDateTime::now() }
                },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session_id, "Failed to append messages: {}", e);
                HistoryError::Database(e.to_string())
            })?;

        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), HistoryError> {
        let result = self
            .collection
            .delete_one(doc! { "SessionId": session_id }, None)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session_id, "Failed to clear history: {}", e);
                HistoryError::Database(e.to_string())
            })?;

        tracing::debug!(
            session_id = %session_id,
            deleted = result.deleted_count,
            "History cleared"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), HistoryError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                HistoryError::Database(e.to_string())
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_document_skips_unknown_kinds() {
        let raw = doc! {
            "SessionId": "abc",
            "History": [
                { "type": "system", "data": { "content": "preamble" } },
                { "type": "human", "data": { "content": "hello" } },
                { "type": "ai", "data": { "content": "hi there" } }
            ]
        };

        let parsed: HistoryDocument = mongodb::bson::from_document(raw).unwrap();
        let messages: Vec<Message> = parsed
            .history
            .into_iter()
            .filter_map(StoredMessage::into_message)
            .collect();

        assert_eq!(
            messages,
            vec![Message::user("hello"), Message::assistant("hi there")]
        );
    }

    #[test]
    fn test_missing_history_field_defaults_empty() {
        let parsed: HistoryDocument =
            mongodb::bson::from_document(doc! { "SessionId": "abc" }).unwrap();
        assert!(parsed.history.is_empty());
    }
}
