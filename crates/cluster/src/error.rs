use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] harvest_vector_store::VectorStoreError),

    #[error("Invalid cluster configuration: {0}")]
    InvalidConfig(String),
}
