use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilgungsplanError {
    #[error("Invalid date format: '{input}' — {reason}")]
    InvalidDateFormat { input: String, reason: String },

    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for TilgungsplanError {
    fn from(e: serde_json::Error) -> Self {
        TilgungsplanError::SerializationError(e.to_string())
    }
}
