//! Handler error taxonomy and its mapping onto the response envelope.

use crate::response::ApiResponse;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// No route matches the method and path.
    #[error("Invalid request")]
    Routing,

    /// A retrieval, generation or history store call failed. The message
    /// embeds the adapter's error text.
    #[error("{0}")]
    Upstream(String),

    /// The request body is not valid JSON for the operation.
    #[error("Internal server error: {0}")]
    MalformedBody(String),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) | HandlerError::Routing => StatusCode::BAD_REQUEST,
            HandlerError::Upstream(_) | HandlerError::MalformedBody(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        match &self {
            HandlerError::Validation(msg) => tracing::warn!("Validation failed: {}", msg),
            HandlerError::Routing => tracing::warn!("No route matched request"),
            HandlerError::Upstream(msg) | HandlerError::MalformedBody(msg) => {
                tracing::error!(status = status.as_u16(), "Request failed: {}", msg)
            }
        }
        ApiResponse::error(status, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HandlerError::Validation("query is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(HandlerError::Routing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            HandlerError::Upstream("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HandlerError::MalformedBody("eof".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_routing_error_body() {
        let response = HandlerError::Routing.into_response();
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, r#"{"error":"Invalid request"}"#);
    }

    #[test]
    fn test_upstream_error_embeds_text() {
        let response =
            HandlerError::Upstream("Upstream service error: API error: quota".into()).into_response();
        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("API error: quota"));
    }
}
