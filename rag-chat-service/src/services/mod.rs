pub mod database;
pub mod history;
pub mod memory;
pub mod orchestrator;
pub mod providers;
pub mod session;

pub use database::MongoHistoryStore;
pub use history::{HistoryError, HistoryStore, InMemoryHistoryStore};
pub use memory::ConversationMemory;
pub use orchestrator::{OrchestratorError, OrchestratorSettings, QueryOrchestrator};
pub use session::resolve_conversation_id;
