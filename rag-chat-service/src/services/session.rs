//! Conversation identifier resolution.

use uuid::Uuid;

/// Return the client-supplied conversation id, or mint a fresh one when it
/// is absent or empty. Supplied ids are not validated beyond that.
pub fn resolve_conversation_id(supplied: Option<&str>) -> String {
    match supplied.filter(|id| !id.is_empty()) {
        Some(id) => {
            tracing::info!(conversation_id = %id, "Using supplied conversation id");
            id.to_string()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            tracing::info!(conversation_id = %id, "Generated new conversation id");
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_supplied_id_is_returned_unchanged() {
        assert_eq!(resolve_conversation_id(Some("my session!")), "my session!");
    }

    #[test]
    fn test_missing_or_empty_id_generates_fresh() {
        let generated: HashSet<String> = (0..50)
            .map(|i| resolve_conversation_id(if i % 2 == 0 { None } else { Some("") }))
            .collect();

        assert_eq!(generated.len(), 50);
        assert!(generated.iter().all(|id| !id.is_empty()));
    }
}
