//! # HarvestFlow Vector Store
//!
//! Deterministic embeddings and cosine-similarity search for conversation
//! messages.
//!
//! ## Features
//!
//! - **Hashed bag-of-tokens embeddings**: pure, reproducible, no model download
//! - **Two index backends** behind one async trait: in-memory and file-persisted
//! - **Stable ranking**: equal scores keep insertion order
//!
//! ## Architecture
//!
//! ```text
//! Message text
//!     │
//!     ├──> HashEmbedder
//!     │      └─> Vector[1024] (clustering) / Vector[512] (drift guard)
//!     │
//!     └──> VectorIndex
//!            ├─> MemoryIndex (process lifetime)
//!            └─> FileIndex   (hydrate once, rewrite on upsert)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use harvest_vector_store::{HashEmbedder, MemoryIndex, VectorIndex};
//!
//! #[tokio::main]
//! async fn main() -> harvest_vector_store::Result<()> {
//!     let embedder = HashEmbedder::for_messages();
//!     let mut index = MemoryIndex::new();
//!
//!     index
//!         .upsert("m1", embedder.embed("deploy the api"), serde_json::json!({"role": "user"}))
//!         .await?;
//!
//!     for hit in index.query(&embedder.embed("api deploy"), 5).await? {
//!         println!("{}: {:.3}", hit.id, hit.score);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod embeddings;
mod error;
mod flat_index;
mod store;
mod types;

pub use config::{VectorBackend, VectorStoreConfig, DEFAULT_FILE_STORE_PATH};
pub use embeddings::{
    cosine_similarity, tokenize, HashEmbedder, DRIFT_GUARD_DIMENSION, MESSAGE_DIMENSION,
};
pub use error::{Result, VectorStoreError};
pub use store::{FileIndex, MemoryIndex, VectorIndex};
pub use types::{IndexEntry, QueryHit};
