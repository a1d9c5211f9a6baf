use crate::error::{DriftError, Result};
use crate::report::{GuardCheck, GuardReport};
use harvest_packager::sha256_hex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH: &str = "drift/fingerprint.config.json";
pub const BASELINE_PATH: &str = "drift/fingerprint.baseline.json";
pub const CURRENT_PATH: &str = "drift/fingerprint.current.json";

/// Locked file path (as configured) → SHA-256 hex digest.
pub type FingerprintMap = BTreeMap<String, String>;

/// Files whose content must not change without an explicit baseline update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintConfig {
    #[serde(default)]
    pub lock: Vec<String>,
}

impl FingerprintConfig {
    pub fn load(base: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&read(&base.join(CONFIG_PATH))?)?)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DriftError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Hash every locked file that exists. Lock entries are resolved against `base`.
pub fn compute_fingerprints(base: &Path, config: &FingerprintConfig) -> Result<FingerprintMap> {
    let mut hashes = FingerprintMap::new();
    for file in &config.lock {
        let path = base.join(file);
        match fs::read(&path) {
            Ok(bytes) => {
                hashes.insert(file.clone(), sha256_hex(&bytes));
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Locked file {file} not found; skipping");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(hashes)
}

pub fn load_fingerprints(path: &Path) -> Result<FingerprintMap> {
    Ok(serde_json::from_str(&read(path)?)?)
}

pub fn write_fingerprints(path: &Path, map: &FingerprintMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(map)?)?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintDiff {
    /// In both maps with different hashes. The only category that gates.
    pub changed: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl FingerprintDiff {
    #[must_use]
    pub fn has_drift(&self) -> bool {
        !self.changed.is_empty()
    }

    /// `checked` counts the keys present in both maps.
    #[must_use]
    pub fn to_report(&self, checked: usize) -> GuardReport {
        let mut report = GuardReport::new(GuardCheck::Fingerprint);
        report.checked = checked;
        for path in &self.changed {
            report.fail(path.clone(), "content changed since baseline");
        }
        report
    }
}

pub fn compare_fingerprints(baseline: &FingerprintMap, current: &FingerprintMap) -> FingerprintDiff {
    let mut diff = FingerprintDiff::default();
    for (path, hash) in current {
        match baseline.get(path) {
            Some(expected) if expected != hash => diff.changed.push(path.clone()),
            Some(_) => {}
            None => diff.added.push(path.clone()),
        }
    }
    diff.removed = baseline
        .keys()
        .filter(|path| !current.contains_key(*path))
        .cloned()
        .collect();
    diff
}

/// Compare `drift/fingerprint.baseline.json` with `drift/fingerprint.current.json`.
pub fn check_fingerprints(base: &Path) -> Result<(FingerprintDiff, GuardReport)> {
    let baseline = load_fingerprints(&base.join(BASELINE_PATH))?;
    let current = load_fingerprints(&base.join(CURRENT_PATH))?;
    let diff = compare_fingerprints(&baseline, &current);

    for path in &diff.added {
        log::info!("Fingerprint for {path} has no baseline entry");
    }
    for path in &diff.removed {
        log::info!("Baseline fingerprint {path} no longer computed");
    }

    let shared = current.keys().filter(|k| baseline.contains_key(*k)).count();
    let report = diff.to_report(shared);
    Ok((diff, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn map(pairs: &[(&str, &str)]) -> FingerprintMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn compute_skips_missing_locked_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("prompts")).unwrap();
        fs::write(temp.path().join("prompts/system.md"), "abc").unwrap();
        let config = FingerprintConfig {
            lock: vec!["prompts/system.md".to_string(), "missing.json".to_string()],
        };

        let hashes = compute_fingerprints(temp.path(), &config).unwrap();
        assert_eq!(
            hashes,
            map(&[(
                "prompts/system.md",
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            )])
        );
    }

    #[test]
    fn only_changed_keys_gate() {
        let baseline = map(&[("a", "1"), ("b", "2"), ("gone", "3")]);
        let current = map(&[("a", "1"), ("b", "9"), ("new", "4")]);

        let diff = compare_fingerprints(&baseline, &current);
        assert_eq!(diff.changed, vec!["b"]);
        assert_eq!(diff.added, vec!["new"]);
        assert_eq!(diff.removed, vec!["gone"]);
        assert!(diff.has_drift());

        let no_change = compare_fingerprints(&baseline, &map(&[("a", "1"), ("new", "4")]));
        assert!(!no_change.has_drift());
        assert!(no_change.to_report(1).passed());
    }

    #[test]
    fn check_reads_baseline_and_current_files() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        write_fingerprints(&base.join(BASELINE_PATH), &map(&[("a", "1")])).unwrap();
        write_fingerprints(&base.join(CURRENT_PATH), &map(&[("a", "2")])).unwrap();

        let (diff, report) = check_fingerprints(base).unwrap();
        assert_eq!(diff.changed, vec!["a"]);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.checked, 1);
    }

    #[test]
    fn missing_baseline_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = check_fingerprints(temp.path()).unwrap_err();
        assert!(matches!(err, DriftError::ReadFailed { .. }));
    }
}
