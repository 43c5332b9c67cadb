//! HTTP transport for the event handler.

use crate::dtos::ApiGatewayEvent;
use crate::error::HandlerError;
use crate::handlers::handle_event;
use crate::response::ApiResponse;
use crate::startup::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use axum::Json;
use std::collections::HashMap;

/// Convert a plain HTTP request into an event and answer with its envelope.
///
/// A body that is not UTF-8 is answered with the error envelope; an
/// unparseable query string is treated as absent.
pub async fn proxy_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    params: Option<Query<HashMap<String, String>>>,
    body: Bytes,
) -> ApiResponse {
    let body = match String::from_utf8(body.to_vec()) {
        Ok(body) => body,
        Err(e) => return HandlerError::MalformedBody(e.to_string()).into_response(),
    };
    let params = params.map(|Query(params)| params).unwrap_or_default();

    let event = ApiGatewayEvent {
        http_method: method.as_str().to_string(),
        path: uri.path().to_string(),
        body: (!body.is_empty()).then_some(body),
        query_string_parameters: (!params.is_empty()).then_some(params),
    };

    handle_event(&state, event).await
}

/// Accept a raw proxy event and return the envelope as JSON, as an
/// API Gateway integration would receive it.
pub async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<ApiGatewayEvent>,
) -> Json<ApiResponse> {
    Json(handle_event(&state, event).await)
}

#[cfg(test)]
mod tests {
    use crate::services::providers::mock::{MockChatModel, MockRetriever};
    use crate::services::providers::GenerationParams;
    use crate::services::{InMemoryHistoryStore, OrchestratorSettings};
    use crate::startup::{router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MockRetriever::new(vec![])),
            Arc::new(MockChatModel::new()),
            Arc::new(InMemoryHistoryStore::new()),
            GenerationParams::default(),
            OrchestratorSettings::default(),
        )
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_non_utf8_body_gets_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/query")
            .header("content-type", "application/json")
            .body(Body::from(vec![0xff, 0xfe, 0xfd]))
            .unwrap();

        let response = router(state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Internal server error: "));
    }

    #[tokio::test]
    async fn test_query_string_reaches_history_handler() {
        let request = Request::builder()
            .method("GET")
            .uri("/prod/history?conversationId=abc")
            .body(Body::empty())
            .unwrap();

        let response = router(state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "messages": [] }));
    }

    #[tokio::test]
    async fn test_post_body_reaches_query_handler() {
        let request = Request::builder()
            .method("POST")
            .uri("/query")
            .body(Body::from(r#"{"query":"hi","conversationId":"c1"}"#))
            .unwrap();

        let response = router(state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await["conversationId"], "c1");
    }

    #[tokio::test]
    async fn test_unmatched_route_gets_error_envelope() {
        let request = Request::builder()
            .method("PUT")
            .uri("/query")
            .body(Body::empty())
            .unwrap();

        let response = router(state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "OPTIONS,POST,GET,DELETE"
        );
        assert_eq!(json_body(response).await, json!({ "error": "Invalid request" }));
    }
}
