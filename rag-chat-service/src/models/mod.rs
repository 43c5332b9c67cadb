//! Domain models for the RAG chat service.

pub mod document;
pub mod message;
pub mod query;

pub use document::{DocumentLocation, DocumentMetadata, RetrievedDocument, S3Location};
pub use message::{Message, MessageRole, StoredMessage, StoredMessageData};
pub use query::{Citation, QueryResult};
