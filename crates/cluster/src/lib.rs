//! # HarvestFlow Cluster
//!
//! Groups an unordered conversation into topics.
//!
//! ## Pipeline
//!
//! ```text
//! Message[]
//!     │
//!     ├──> drop tool messages
//!     │
//!     ├──> VectorIndex (upsert 1024-dim embeddings)
//!     │
//!     ├──> seeds: first 12 user messages with a non-empty first line
//!     │      └─> top-50 neighbours per seed title
//!     │
//!     └──> greedy claim in seed order
//!            └─> Topic[] (ids partition the input)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use harvest_cluster::TopicClusterer;
//! use harvest_vector_store::VectorStoreConfig;
//!
//! # async fn run(messages: Vec<harvest_protocol::Message>) -> harvest_cluster::Result<()> {
//! let mut clusterer = TopicClusterer::new(VectorStoreConfig::memory().open());
//! for topic in clusterer.cluster(&messages).await? {
//!     println!("{} ({} messages)", topic.title, topic.ids.len());
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod stats;
mod topics;

pub use config::ClusterConfig;
pub use error::{ClusterError, Result};
pub use stats::ClusterStats;
pub use topics::{seed_title, TopicClusterer};
