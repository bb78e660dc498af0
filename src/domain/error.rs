// Ingestion errors raised while validating source documents

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}
