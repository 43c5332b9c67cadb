use crate::dtos::{validation_message, ApiGatewayEvent, QueryRequest};
use crate::error::HandlerError;
use crate::response::ApiResponse;
use crate::services::resolve_conversation_id;
use crate::startup::AppState;
use validator::Validate;

/// POST .../query
pub async fn submit_query(
    state: &AppState,
    event: &ApiGatewayEvent,
) -> Result<ApiResponse, HandlerError> {
    let request: QueryRequest = event
        .json_body()
        .map_err(|e| HandlerError::MalformedBody(e.to_string()))?;

    request
        .validate()
        .map_err(|e| HandlerError::Validation(validation_message(&e)))?;

    let conversation_id = resolve_conversation_id(request.conversation_id.as_deref());

    let result = state
        .orchestrator
        .answer(&conversation_id, &request.query)
        .await
        .map_err(|e| {
            tracing::error!(conversation_id = %conversation_id, error = %e, "Query failed");
            HandlerError::Upstream(format!("Upstream service error: {}", e))
        })?;

    tracing::info!(
        conversation_id = %conversation_id,
        sources = result.sources.len(),
        "Query answered"
    );

    Ok(ApiResponse::ok(&result))
}
