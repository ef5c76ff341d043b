use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error in {path}: {detail}")]
    PdfParse { path: String, detail: String },

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("unknown embedding model: {0}")]
    UnknownModel(String),

    #[error("embedding model failure: {0}")]
    Model(String),

    #[error("embedding failed for page {page}: {detail}")]
    Compute { page: u32, detail: String },

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error("another run holds the lock file: {0}")]
    Held(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
