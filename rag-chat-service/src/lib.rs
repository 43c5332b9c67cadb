//! rag-chat-service: question answering over a knowledge base with
//! persistent conversation history.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod services;
pub mod startup;

pub use dtos::ApiGatewayEvent;
pub use handlers::handle_event;
pub use response::ApiResponse;
pub use startup::{AppState, Application};
