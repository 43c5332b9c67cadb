use serde::Deserialize;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "query is required"))]
    pub query: String,

    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHistoryRequest {
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// First human-readable message in a set of validation errors.
pub fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_fails_validation() {
        let request: QueryRequest = serde_json::from_str(r#"{"query": ""}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "query is required");
    }

    #[test]
    fn test_missing_query_fails_validation() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"conversationId": "abc"}"#).unwrap();
        assert!(request.validate().is_err());
        assert_eq!(request.conversation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_valid_query() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"query": "hi", "conversationId": null}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.conversation_id.is_none());
    }
}
