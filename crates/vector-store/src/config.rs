use crate::error::VectorStoreError;
use crate::store::{FileIndex, MemoryIndex, VectorIndex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_FILE_STORE_PATH: &str = "out/vector-store.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    #[default]
    Memory,
    File,
}

impl FromStr for VectorBackend {
    type Err = VectorStoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(VectorStoreError::UnknownBackend(other.to_string())),
        }
    }
}

/// Backend selection, read once when the pipeline starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub backend: VectorBackend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl VectorStoreConfig {
    #[must_use]
    pub const fn memory() -> Self {
        Self {
            backend: VectorBackend::Memory,
            path: None,
        }
    }

    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: VectorBackend::File,
            path: Some(path.into()),
        }
    }

    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_STORE_PATH))
    }

    /// Build a fresh index for one pipeline run.
    #[must_use]
    pub fn open(&self) -> Box<dyn VectorIndex> {
        match self.backend {
            VectorBackend::Memory => {
                log::debug!("Using in-memory vector index");
                Box::new(MemoryIndex::new())
            }
            VectorBackend::File => {
                let path = self.file_path();
                log::debug!("Using file-backed vector index at {}", path.display());
                Box::new(FileIndex::new(path))
            }
        }
    }
}
