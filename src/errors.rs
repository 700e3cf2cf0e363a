use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collection not found: {0}")]
    NoSuchCollection(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Query error: {0}")]
    QueryError(String),
}
