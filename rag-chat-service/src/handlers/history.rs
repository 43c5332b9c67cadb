use crate::dtos::{ApiGatewayEvent, DeleteHistoryRequest, DeleteHistoryResponse, HistoryResponse};
use crate::error::HandlerError;
use crate::response::ApiResponse;
use crate::startup::AppState;

pub const HISTORY_DELETED_MESSAGE: &str = "Conversation history deleted";

const CONVERSATION_ID_PARAM: &str = "conversationId";
const CONVERSATION_ID_REQUIRED: &str = "conversationId is required";

/// GET .../history?conversationId=...
pub async fn get_history(
    state: &AppState,
    event: &ApiGatewayEvent,
) -> Result<ApiResponse, HandlerError> {
    let conversation_id = event
        .query_param(CONVERSATION_ID_PARAM)
        .ok_or_else(|| HandlerError::Validation(CONVERSATION_ID_REQUIRED.to_string()))?;

    let messages = state.history.load(conversation_id).await.map_err(|e| {
        tracing::error!(conversation_id = %conversation_id, error = %e, "Failed to load history");
        HandlerError::Upstream(format!("Internal server error: {}", e))
    })?;

    tracing::info!(
        conversation_id = %conversation_id,
        count = messages.len(),
        "History loaded"
    );

    Ok(ApiResponse::ok(&HistoryResponse { messages }))
}

/// DELETE .../history, id in the body or the query string (body wins).
pub async fn delete_history(
    state: &AppState,
    event: &ApiGatewayEvent,
) -> Result<ApiResponse, HandlerError> {
    let request: DeleteHistoryRequest = event
        .json_body()
        .map_err(|e| HandlerError::MalformedBody(e.to_string()))?;

    let conversation_id = request
        .conversation_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .or_else(|| event.query_param(CONVERSATION_ID_PARAM))
        .ok_or_else(|| HandlerError::Validation(CONVERSATION_ID_REQUIRED.to_string()))?;

    state.history.clear(conversation_id).await.map_err(|e| {
        tracing::error!(conversation_id = %conversation_id, error = %e, "Failed to clear history");
        HandlerError::Upstream(format!("Internal server error: {}", e))
    })?;

    tracing::info!(conversation_id = %conversation_id, "History deleted");

    Ok(ApiResponse::ok(&DeleteHistoryResponse {
        message: HISTORY_DELETED_MESSAGE.to_string(),
    }))
}
