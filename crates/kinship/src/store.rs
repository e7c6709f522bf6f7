/// Backend error codes meaning the backing table has not been migrated yet.
const MISSING_RELATION_CODES: [&str; 2] = ["42P01", "PGRST205"];

/// Error enumeration for store failures, already classified by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("backing relation `{relation}` has not been created yet")]
    SchemaNotReady { relation: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected the request: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Classify a raw backend error for `relation`.
    ///
    /// Structured codes are checked first. Message matching is a last resort for clients that
    /// do not surface a code.
    pub fn classify(relation: &str, code: Option<&str>, message: &str) -> Self {
        let missing_by_code = code
            .map(|code| MISSING_RELATION_CODES.contains(&code.trim()))
            .unwrap_or(false);
        let lowered = message.to_ascii_lowercase();
        let missing_by_message = code.is_none()
            && (lowered.contains("does not exist") || lowered.contains("schema cache"));

        if missing_by_code || missing_by_message {
            StoreError::SchemaNotReady {
                relation: relation.to_string(),
            }
        } else if code.is_some() {
            StoreError::Rejected(message.to_string())
        } else {
            StoreError::Unavailable(message.to_string())
        }
    }

    pub fn is_schema_not_ready(&self) -> bool {
        matches!(self, StoreError::SchemaNotReady { .. })
    }
}
