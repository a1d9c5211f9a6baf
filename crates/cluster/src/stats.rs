use serde::{Deserialize, Serialize};

/// Statistics about one clustering pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStats {
    /// Messages received
    pub messages: usize,

    /// Messages embedded into the index
    pub indexed: usize,

    /// Tool messages left out of similarity search
    pub skipped_tool: usize,

    /// Seeds selected
    pub seeds: usize,

    /// Topics produced (one per seed)
    pub topics: usize,

    /// Message ids claimed by some topic
    pub claimed: usize,

    /// Topics left with no ids after overlap resolution
    pub empty_topics: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}
