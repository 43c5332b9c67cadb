//! Documents returned by the retrieval service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fallback title for documents without a usable source location.
pub const DEFAULT_DOCUMENT_TITLE: &str = "document";

/// Fallback link for citations without a source URI.
pub const DEFAULT_SOURCE_URL: &str = "#";

/// A ranked document from the retrieval service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<DocumentLocation>,

    /// Explicit link for citations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    /// Relevance score reported by the retrieval service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Decimal>,

    /// Remaining metadata attributes, passed through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLocation {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "s3Location", skip_serializing_if = "Option::is_none")]
    pub s3_location: Option<S3Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct S3Location {
    #[serde(default)]
    pub uri: Option<String>,
}

impl RetrievedDocument {
    pub fn new(page_content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    /// Display title: the last path segment of the S3 source URI, or
    /// [`DEFAULT_DOCUMENT_TITLE`] when there is no URI.
    pub fn title(&self) -> String {
        self.metadata
            .location
            .as_ref()
            .and_then(|loc| loc.s3_location.as_ref())
            .and_then(|s3| s3.uri.as_deref())
            .filter(|uri| !uri.is_empty())
            .map(|uri| uri.rsplit('/').next().unwrap_or_default().to_string())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string())
    }

    pub fn source_url(&self) -> String {
        self.metadata
            .source_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string())
    }

    /// First `max_chars` characters of the content, for logging.
    pub fn preview(&self, max_chars: usize) -> String {
        self.page_content.chars().take(max_chars).collect()
    }
}

impl DocumentMetadata {
    pub fn with_s3_uri(uri: impl Into<String>) -> Self {
        Self {
            location: Some(DocumentLocation {
                kind: Some("S3".to_string()),
                s3_location: Some(S3Location {
                    uri: Some(uri.into()),
                }),
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_s3_uri() {
        let doc = RetrievedDocument::new(
            "text",
            DocumentMetadata::with_s3_uri("s3://bucket/manuals/setup-guide.pdf"),
        );
        assert_eq!(doc.title(), "setup-guide.pdf");
    }

    #[test]
    fn test_title_defaults_without_location() {
        let doc = RetrievedDocument::new("text", DocumentMetadata::default());
        assert_eq!(doc.title(), DEFAULT_DOCUMENT_TITLE);
    }

    #[test]
    fn test_title_defaults_for_empty_uri() {
        let doc = RetrievedDocument::new("text", DocumentMetadata::with_s3_uri(""));
        assert_eq!(doc.title(), DEFAULT_DOCUMENT_TITLE);
    }

    #[test]
    fn test_trailing_slash_yields_empty_title() {
        let doc = RetrievedDocument::new("text", DocumentMetadata::with_s3_uri("s3://bucket/dir/"));
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_source_url_default() {
        let mut doc = RetrievedDocument::new("text", DocumentMetadata::default());
        assert_eq!(doc.source_url(), "#");

        doc.metadata.source_uri = Some("https://example.com/a".to_string());
        assert_eq!(doc.source_url(), "https://example.com/a");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let doc = RetrievedDocument::new("日本語のドキュメント", DocumentMetadata::default());
        assert_eq!(doc.preview(3), "日本語");
    }
}
