use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid chat export: {0}")]
    InvalidExport(#[from] serde_json::Error),

    #[error("Invalid message at index {index}: {reason}")]
    InvalidMessage { index: usize, reason: String },
}
