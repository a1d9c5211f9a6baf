use serde::{Deserialize, Serialize};

/// One stored vector. The on-disk file backend is a JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub score: f32,
    pub meta: serde_json::Value,
}
