use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness probe.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.history.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "History store health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({
        "status": "ok",
        "service": "rag-chat-service",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// Readiness probe.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .history
        .health_check()
        .await
        .map_err(|_| AppError::ServiceUnavailable)?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::models::Message;
    use crate::services::providers::mock::{MockChatModel, MockRetriever};
    use crate::services::providers::GenerationParams;
    use crate::services::{HistoryError, HistoryStore, OrchestratorSettings};
    use crate::startup::{router, AppState};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct UnreachableStore;

    #[async_trait]
    impl HistoryStore for UnreachableStore {
        async fn load(&self, _session_id: &str) -> Result<Vec<Message>, HistoryError> {
            Ok(vec![])
        }

        async fn append(&self, _session_id: &str, _messages: &[Message]) -> Result<(), HistoryError> {
            Ok(())
        }

        async fn clear(&self, _session_id: &str) -> Result<(), HistoryError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<(), HistoryError> {
            Err(HistoryError::Database("server selection timeout".to_string()))
        }
    }

    fn unhealthy_state() -> AppState {
        AppState::new(
            Arc::new(MockRetriever::new(vec![])),
            Arc::new(MockChatModel::new()),
            Arc::new(UnreachableStore),
            GenerationParams::default(),
            OrchestratorSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_health_reports_unavailable_store() {
        let response = router(unhealthy_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Service unavailable");
    }

    #[tokio::test]
    async fn test_readiness_reports_unavailable_store() {
        let response = router(unhealthy_state())
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
