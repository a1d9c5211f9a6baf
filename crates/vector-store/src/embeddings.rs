use crate::error::{Result, VectorStoreError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Dimension of the embeddings indexed for clustering.
pub const MESSAGE_DIMENSION: usize = 1024;
/// Dimension of the embeddings compared by the semantic drift guard.
pub const DRIFT_GUARD_DIMENSION: usize = 512;

const HASH_SEED: i32 = 7;
const HASH_MULTIPLIER: i32 = 33;
const MIN_STEM_LEN: usize = 3;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex"));

/// Bag-of-hashed-tokens embedder.
///
/// Every token lands in bucket `|hash| mod dimension`, where `hash` is a
/// 32-bit rolling polynomial over the token's UTF-16 code units. Collisions are
/// expected; callers only rely on relative ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dimension: usize,
    stem: bool,
}

impl HashEmbedder {
    #[must_use]
    pub const fn new(dimension: usize, stem: bool) -> Self {
        Self { dimension, stem }
    }

    /// 1024-dim, stemmed: the embedding indexed by the clustering engine.
    #[must_use]
    pub const fn for_messages() -> Self {
        Self::new(MESSAGE_DIMENSION, true)
    }

    /// 512-dim, unstemmed: the embedding used by the semantic guard.
    #[must_use]
    pub const fn for_drift_guard() -> Self {
        Self::new(DRIFT_GUARD_DIMENSION, false)
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        let lowered = text.to_lowercase();
        for token in tokenize(&lowered) {
            let token = if self.stem {
                stem(token)
            } else {
                Cow::Borrowed(token)
            };
            vector[bucket(&token, self.dimension)] += 1.0;
        }

        normalize(&mut vector);
        vector
    }
}

/// Word runs of `text`, in order.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

fn bucket(token: &str, dimension: usize) -> usize {
    let hash = token.encode_utf16().fold(HASH_SEED, |acc, unit| {
        acc.wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs() as usize % dimension
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    let divisor = if norm == 0.0 { 1.0 } else { norm };
    for value in vector.iter_mut() {
        *value /= divisor;
    }
}

// Suffix rules, longest first. Each maps a suffix to its replacement.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("ization", "ize"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("iveness", "ive"),
    ("ations", "ate"),
    ("ation", "ate"),
    ("ingly", ""),
    ("sses", "ss"),
    ("edly", ""),
    ("ies", "i"),
    ("ing", ""),
    ("ed", ""),
    ("ly", ""),
];

/// Light suffix-stripping stemmer so that "deploying", "deployed" and
/// "deploys" share a bucket.
fn stem(token: &str) -> Cow<'_, str> {
    if token.len() <= MIN_STEM_LEN || !token.bytes().all(|b| b.is_ascii_lowercase()) {
        return Cow::Borrowed(token);
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(base) = token.strip_suffix(suffix) {
            if base.len() >= MIN_STEM_LEN {
                return Cow::Owned(format!("{base}{replacement}"));
            }
            return Cow::Borrowed(token);
        }
    }

    if let Some(base) = token.strip_suffix('s') {
        let keeps_s = base.ends_with('s') || base.ends_with('u') || base.ends_with('i');
        if !keeps_s && base.len() >= MIN_STEM_LEN {
            return Cow::Borrowed(base);
        }
    }

    Cow::Borrowed(token)
}

/// Cosine similarity of two equal-length vectors. A zero norm is treated as 1,
/// so a zero vector scores 0 against anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(VectorStoreError::InvalidDimension {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_a = if norm_a == 0.0 { 1.0 } else { norm_a };
    let norm_b = if norm_b == 0.0 { 1.0 } else { norm_b };

    Ok(dot / (norm_a * norm_b))
}
