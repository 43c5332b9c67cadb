//! Uniform response envelope.
//!
//! Every outcome, success or error, is returned as
//! `{statusCode, headers, body}` where `body` is a JSON string and the
//! headers carry the fixed CORS set. `rust_decimal::Decimal` values in a
//! payload are written as JSON floats; that conversion can lose precision.

use crate::dtos::ErrorBody;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "OPTIONS,POST,GET,DELETE";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

const SERIALIZATION_FAILURE_BODY: &str = r#"{"error":"Failed to serialize response"}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self {
                status_code: status.as_u16(),
                headers: default_headers(),
                body,
            },
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                Self {
                    status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    headers: default_headers(),
                    body: SERIALIZATION_FAILURE_BODY.to_string(),
                }
            }
        }
    }

    pub fn ok<T: Serialize>(payload: &T) -> Self {
        Self::json(StatusCode::OK, payload)
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::json(
            status,
            &ErrorBody {
                error: message.into(),
            },
        )
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
        (
            "Access-Control-Allow-Origin".to_string(),
            CORS_ALLOW_ORIGIN.to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            CORS_ALLOW_METHODS.to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            CORS_ALLOW_HEADERS.to_string(),
        ),
    ])
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();

        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Skipping invalid response header"),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::ok(&serde_json::json!({ "message": "done" }));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["headers"]["Content-Type"], "application/json");
        assert_eq!(json["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            json["headers"]["Access-Control-Allow-Methods"],
            "OPTIONS,POST,GET,DELETE"
        );
        assert_eq!(json["headers"]["Access-Control-Allow-Headers"], "Content-Type");
        assert_eq!(json["body"], r#"{"message":"done"}"#);
    }

    #[test]
    fn test_error_body() {
        let response = ApiResponse::error(StatusCode::BAD_REQUEST, "Invalid request");
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, r#"{"error":"Invalid request"}"#);
        assert_eq!(response.headers.len(), 4);
    }

    #[test]
    fn test_decimal_serialized_as_float() {
        #[derive(Serialize)]
        struct Payload {
            score: Decimal,
        }

        let response = ApiResponse::ok(&Payload {
            score: Decimal::from_str("0.25").unwrap(),
        });
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert!(body["score"].is_f64());
        assert_eq!(body["score"].as_f64(), Some(0.25));
    }

    #[test]
    fn test_unserializable_payload_degrades_to_500() {
        struct Unserializable;

        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("value cannot be encoded"))
            }
        }

        let response = ApiResponse::ok(&Unserializable);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, SERIALIZATION_FAILURE_BODY);
        assert_eq!(response.headers, default_headers());
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["error"], "Failed to serialize response");
    }

    #[test]
    fn test_into_http_response() {
        let response = ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
