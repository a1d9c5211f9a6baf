use crate::error::{Result, VectorStoreError};
use crate::flat_index::FlatIndex;
use crate::types::{IndexEntry, QueryHit};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Upsert/query contract shared by every backend.
#[async_trait]
pub trait VectorIndex: Send {
    /// Insert or replace the entry stored under `id`.
    async fn upsert(&mut self, id: &str, vector: Vec<f32>, meta: serde_json::Value) -> Result<()>;

    /// Top `k` entries by cosine similarity, descending; ties keep insertion order.
    async fn query(&mut self, vector: &[f32], k: usize) -> Result<Vec<QueryHit>>;

    /// Top `k` among the entries whose id passes `keep`. Entries filtered out
    /// do not count against `k`.
    async fn query_where(
        &mut self,
        vector: &[f32],
        k: usize,
        keep: &(dyn for<'a> Fn(&'a str) -> bool + Sync),
    ) -> Result<Vec<QueryHit>>;

    /// Number of entries currently held in memory.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Volatile index owned by a single pipeline run.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    inner: FlatIndex,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&mut self, id: &str, vector: Vec<f32>, meta: serde_json::Value) -> Result<()> {
        self.inner.upsert(IndexEntry {
            id: id.to_string(),
            vector,
            meta,
        })
    }

    async fn query(&mut self, vector: &[f32], k: usize) -> Result<Vec<QueryHit>> {
        self.inner.query(vector, k)
    }

    async fn query_where(
        &mut self,
        vector: &[f32],
        k: usize,
        keep: &(dyn for<'a> Fn(&'a str) -> bool + Sync),
    ) -> Result<Vec<QueryHit>> {
        self.inner.query_where(vector, k, keep)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Single-file index. The whole file is loaded on first access and rewritten
/// on every upsert; one writer per file is assumed.
#[derive(Debug)]
pub struct FileIndex {
    path: PathBuf,
    cache: Option<FlatIndex>,
}

impl FileIndex {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn hydrate(&mut self) -> Result<&mut FlatIndex> {
        if self.cache.is_none() {
            let index = match tokio::fs::read(&self.path).await {
                Ok(bytes) => match Self::decode(&bytes) {
                    Ok(index) => {
                        log::info!(
                            "Hydrated {} vectors from {}",
                            index.len(),
                            self.path.display()
                        );
                        index
                    }
                    Err(err) => {
                        log::warn!(
                            "Unable to hydrate {} ({err}); starting with an empty index",
                            self.path.display()
                        );
                        FlatIndex::new()
                    }
                },
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => FlatIndex::new(),
                Err(err) => return Err(err.into()),
            };
            self.cache = Some(index);
        }
        Ok(self.cache.get_or_insert_with(FlatIndex::new))
    }

    fn decode(bytes: &[u8]) -> Result<FlatIndex> {
        let entries: Vec<IndexEntry> = serde_json::from_slice(bytes)?;
        FlatIndex::from_entries(entries)
    }

    async fn persist(&self) -> Result<()> {
        let Some(index) = &self.cache else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_vec_pretty(index.entries())?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(VectorStoreError::from)
    }
}

#[async_trait]
impl VectorIndex for FileIndex {
    async fn upsert(&mut self, id: &str, vector: Vec<f32>, meta: serde_json::Value) -> Result<()> {
        self.hydrate().await?.upsert(IndexEntry {
            id: id.to_string(),
            vector,
            meta,
        })?;
        self.persist().await
    }

    async fn query(&mut self, vector: &[f32], k: usize) -> Result<Vec<QueryHit>> {
        self.hydrate().await?.query(vector, k)
    }

    async fn query_where(
        &mut self,
        vector: &[f32],
        k: usize,
        keep: &(dyn for<'a> Fn(&'a str) -> bool + Sync),
    ) -> Result<Vec<QueryHit>> {
        self.hydrate().await?.query_where(vector, k, keep)
    }

    fn len(&self) -> usize {
        self.cache.as_ref().map_or(0, FlatIndex::len)
    }
}
