use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};

/// Bounds for one clustering pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Maximum number of seed messages (first N user messages in input order)
    pub max_seeds: usize,

    /// Neighbours requested from the index per seed
    pub neighbors: usize,

    /// Seed titles are the first line of the message, cut to this many characters
    pub title_max_chars: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_seeds: 12,
            neighbors: 50,
            title_max_chars: 80,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.title_max_chars == 0 {
            return Err(ClusterError::InvalidConfig(
                "title_max_chars must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
