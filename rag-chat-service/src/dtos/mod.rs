//! Inbound events and request/response payloads.

pub mod events;
pub mod requests;
pub mod responses;

pub use events::ApiGatewayEvent;
pub use requests::{validation_message, DeleteHistoryRequest, QueryRequest};
pub use responses::{DeleteHistoryResponse, ErrorBody, HistoryResponse};
