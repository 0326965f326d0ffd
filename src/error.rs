use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid reduction policy: {0}")]
    InvalidPolicy(String),

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("Malformed GeoJSON: {0}")]
    Malformed(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
