//! Application startup and lifecycle management.
//!
//! Builds the external service adapters once per process and serves the
//! event handler over HTTP.

use crate::config::RagChatConfig;
use crate::handlers::{health, proxy};
use crate::services::providers::auth::Authentication;
use crate::services::providers::converse::{ConverseChatModel, ConverseConfig};
use crate::services::providers::knowledge_base::{KnowledgeBaseConfig, KnowledgeBaseRetriever};
use crate::services::providers::{ChatModel, DocumentRetriever, GenerationParams};
use crate::services::{
    ConversationMemory, HistoryStore, MongoHistoryStore, OrchestratorSettings, QueryOrchestrator,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state: the external service handles, constructed
/// once and passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<QueryOrchestrator>,
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    pub fn new(
        retriever: Arc<dyn DocumentRetriever>,
        model: Arc<dyn ChatModel>,
        history: Arc<dyn HistoryStore>,
        params: GenerationParams,
        settings: OrchestratorSettings,
    ) -> Self {
        let memory = ConversationMemory::new(history.clone(), model, params);
        Self {
            orchestrator: Arc::new(QueryOrchestrator::new(retriever, memory, settings)),
            history,
        }
    }

    /// Wire the managed services described by `config`.
    pub async fn from_config(config: &RagChatConfig) -> Result<Self, AppError> {
        let history = MongoHistoryStore::connect(
            &config.history.mongodb_uri,
            &config.history.database,
            &config.history.table_name,
        )
        .await?;
        history.initialize_indexes().await?;

        let auth = Authentication::resolve(config.api_key.clone(), &config.region)
            .await
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?;

        let retriever = KnowledgeBaseRetriever::new(KnowledgeBaseConfig {
            endpoint: config.knowledge_base.endpoint.clone(),
            knowledge_base_id: config.knowledge_base.id.clone(),
            auth: auth.clone(),
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?;

        tracing::info!(
            knowledge_base_id = %config.knowledge_base.id,
            number_of_results = config.knowledge_base.number_of_results,
            "Initialized knowledge base retriever"
        );

        let model = ConverseChatModel::new(ConverseConfig {
            endpoint: config.model.endpoint.clone(),
            model_id: config.model.id.clone(),
            auth,
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?;

        tracing::info!(model = %config.model.id, "Initialized chat model");

        if config.grounded_generation {
            tracing::info!("Grounded generation enabled: prompts include retrieved context");
        }

        Ok(Self::new(
            Arc::new(retriever),
            Arc::new(model),
            Arc::new(history),
            GenerationParams {
                temperature: config.model.temperature,
                max_tokens: config.model.max_tokens,
            },
            OrchestratorSettings {
                number_of_results: config.knowledge_base.number_of_results,
                grounded_generation: config.grounded_generation,
            },
        ))
    }
}

/// HTTP router: probes, the raw event endpoint, and every other request
/// translated into an event.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/invoke", post(proxy::invoke))
        .fallback(proxy::proxy_request)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RagChatConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config).await.map_err(|e| {
            tracing::error!("Failed to initialize services: {}", e);
            e
        })?;

        Self::with_state(config.common.port, state).await
    }

    /// Bind to `port` (0 picks a random port) with prebuilt state.
    pub async fn with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let http_addr = SocketAddr::from(([0, 0, 0, 0], port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!("RAG chat service listening on port {}", http_port);

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.http_listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
