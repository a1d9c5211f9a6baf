use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriftError>;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Packager error: {0}")]
    PackagerError(#[from] harvest_packager::PackagerError),

    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] harvest_vector_store::VectorStoreError),

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Schema not found at {}", .0.display())]
    MissingSchema(PathBuf),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("No live outputs at {}; run the workflow before saving snapshots", .0.display())]
    NoLiveOutputs(PathBuf),

    #[error("No markdown or JSON outputs found under {}", .0.display())]
    NoEligibleOutputs(PathBuf),
}
