use crate::embeddings::cosine_similarity;
use crate::error::{Result, VectorStoreError};
use crate::types::{IndexEntry, QueryHit};
use std::collections::HashMap;

/// Brute-force cosine index shared by both backends.
///
/// Entries keep insertion order; an upsert of an existing id replaces the
/// entry in place, so tie-breaking stays stable across replacements.
#[derive(Debug, Default)]
pub(crate) struct FlatIndex {
    dimension: Option<usize>,
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}

impl FlatIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<IndexEntry>) -> Result<Self> {
        let mut index = Self::new();
        for entry in entries {
            index.upsert(entry)?;
        }
        Ok(index)
    }

    pub(crate) fn upsert(&mut self, entry: IndexEntry) -> Result<()> {
        self.check_dimension(entry.vector.len())?;
        self.dimension.get_or_insert(entry.vector.len());

        if let Some(pos) = self.positions.get(&entry.id).copied() {
            self.entries[pos] = entry;
            return Ok(());
        }
        self.positions.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Top `k` entries by cosine similarity, descending.
    pub(crate) fn query(&self, vector: &[f32], k: usize) -> Result<Vec<QueryHit>> {
        self.query_where(vector, k, |_| true)
    }

    /// Like [`FlatIndex::query`], restricted to ids accepted by `keep`.
    /// Rejected entries never take one of the `k` slots.
    pub(crate) fn query_where(
        &self,
        vector: &[f32],
        k: usize,
        keep: impl Fn(&str) -> bool,
    ) -> Result<Vec<QueryHit>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        self.check_dimension(vector.len())?;

        let mut scored = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter().filter(|entry| keep(&entry.id)) {
            scored.push((cosine_similarity(vector, &entry.vector)?, entry));
        }

        // `sort_by` is stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| QueryHit {
                id: entry.id.clone(),
                score,
                meta: entry.meta.clone(),
            })
            .collect())
    }

    pub(crate) fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(VectorStoreError::InvalidDimension { expected, actual })
            }
            _ => Ok(()),
        }
    }
}
