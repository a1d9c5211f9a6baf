use crate::error::Result;
use crate::report::{GuardCheck, GuardReport};
use crate::settings::DriftSettings;
use crate::snapshot::{read_lossy, snapshot_files};
use harvest_vector_store::{cosine_similarity, HashEmbedder};
use std::path::{Path, PathBuf};

/// Cosine similarity of the 512-dim hashed embeddings of two texts.
pub fn semantic_similarity(golden: &str, live: &str) -> Result<f32> {
    let embedder = HashEmbedder::for_drift_guard();
    Ok(cosine_similarity(
        &embedder.embed(golden),
        &embedder.embed(live),
    )?)
}

/// Configured pairs, or every golden snapshot matched with its live twin.
/// Pairs are relative to `base`.
fn comparison_pairs(base: &Path, settings: &DriftSettings) -> Result<Vec<(PathBuf, PathBuf)>> {
    if let Some(pairs) = &settings.semantic_pairs {
        return Ok(pairs.clone());
    }

    let golden_root = base.join(&settings.golden_root);
    if !golden_root.is_dir() {
        return Ok(Vec::new());
    }
    Ok(snapshot_files(&golden_root)?
        .into_iter()
        .map(|(relative, _)| {
            (
                settings.golden_root.join(&relative),
                settings.live_root.join(&relative),
            )
        })
        .collect())
}

/// Flag every pair whose similarity falls below `semanticMinSim`. Pairs with a
/// missing side are skipped.
pub fn semantic_guard(base: &Path, settings: &DriftSettings) -> Result<GuardReport> {
    let mut report = GuardReport::new(GuardCheck::Semantic);

    for (golden, live) in comparison_pairs(base, settings)? {
        let golden_path = base.join(&golden);
        let live_path = base.join(&live);
        if !golden_path.is_file() || !live_path.is_file() {
            log::debug!(
                "Skipping semantic pair {} / {}",
                golden.display(),
                live.display()
            );
            continue;
        }

        report.checked += 1;
        let similarity = semantic_similarity(&read_lossy(&golden_path)?, &read_lossy(&live_path)?)?;
        if f64::from(similarity) < settings.semantic_min_sim {
            report.fail(
                live.to_string_lossy(),
                format!(
                    "sim={similarity:.3} < {:.3}",
                    settings.semantic_min_sim
                ),
            );
        } else {
            log::debug!("{}: sim={similarity:.3}", live.display());
        }
    }

    Ok(report)
}
