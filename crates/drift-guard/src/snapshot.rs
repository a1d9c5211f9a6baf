use crate::error::{DriftError, Result};
use crate::report::{GuardCheck, GuardReport};
use crate::settings::DriftSettings;
use harvest_packager::{collect_files, relative_slash_path};
use std::fs;
use std::path::{Path, PathBuf};

/// `.md` and `.json` files are the only ones held as snapshots.
#[must_use]
pub fn is_snapshot_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("json"))
}

/// Edit distance over Unicode scalar values.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Largest distance tolerated for a golden text of `golden_chars` characters.
#[must_use]
pub fn edit_budget(golden_chars: usize, budget_pct: f64) -> usize {
    (golden_chars as f64 * budget_pct).ceil().max(0.0) as usize
}

/// Snapshot files under `root`, as `(relative path, absolute path)`.
pub(crate) fn snapshot_files(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    collect_files(root)?
        .into_iter()
        .filter(|path| is_snapshot_file(path))
        .map(|path| -> Result<(String, PathBuf)> {
            Ok((relative_slash_path(root, &path)?, path))
        })
        .collect()
}

pub(crate) fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| DriftError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Compare every golden snapshot with its live counterpart. All files are
/// checked; failures are aggregated into the report.
pub fn snapshot_diff(base: &Path, settings: &DriftSettings) -> Result<GuardReport> {
    let golden_root = base.join(&settings.golden_root);
    let live_root = base.join(&settings.live_root);
    let mut report = GuardReport::new(GuardCheck::Snapshot);

    if !golden_root.is_dir() {
        log::info!(
            "No golden snapshots at {}; skipping drift comparison",
            golden_root.display()
        );
        return Ok(report);
    }

    for (relative, golden_path) in snapshot_files(&golden_root)? {
        report.checked += 1;
        let live_path = live_root.join(&relative);
        if !live_path.is_file() {
            report.fail(relative, "missing live file");
            continue;
        }

        let golden = read_lossy(&golden_path)?;
        let live = read_lossy(&live_path)?;
        let distance = levenshtein(&golden, &live);
        let budget = edit_budget(golden.chars().count(), settings.edit_budget_pct);
        if distance > budget {
            report.fail(relative, format!("lev={distance} > budget={budget}"));
        } else {
            log::debug!("{relative}: lev={distance} within budget={budget}");
        }
    }

    Ok(report)
}

/// Copy every live `.md`/`.json` output into the golden root. Returns the
/// relative paths saved.
pub fn save_snapshots(base: &Path, settings: &DriftSettings) -> Result<Vec<String>> {
    let live_root = base.join(&settings.live_root);
    if !live_root.is_dir() {
        return Err(DriftError::NoLiveOutputs(live_root));
    }

    let files = snapshot_files(&live_root)?;
    if files.is_empty() {
        return Err(DriftError::NoEligibleOutputs(live_root));
    }

    let golden_root = base.join(&settings.golden_root);
    let mut saved = Vec::with_capacity(files.len());
    for (relative, source) in files {
        let target = golden_root.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &target)?;
        log::info!("Saved snapshot {relative}");
        saved.push(relative);
    }
    Ok(saved)
}
