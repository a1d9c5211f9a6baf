use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackagerError>;

#[derive(Error, Debug)]
pub enum PackagerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    ProtocolError(#[from] harvest_protocol::ProtocolError),

    #[error("Archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Deliverable path '{0}' escapes the flow directory")]
    UnsafePath(String),

    #[error("Metrics of flow '{0}' fall outside [0, 1]")]
    MetricsOutOfRange(String),

    #[error("{} is not under {}", path.display(), base.display())]
    OutsideBase { path: PathBuf, base: PathBuf },
}
