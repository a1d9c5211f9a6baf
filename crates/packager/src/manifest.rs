use crate::error::Result;
use crate::files::{collect_files, hash_file, relative_slash_path};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MANIFEST_VERSION: &str = "3.1.0";

/// Roots hashed by default, relative to the workspace base.
pub const DEFAULT_MANIFEST_ROOTS: [&str; 2] = ["agents/outputs", "out/flows"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub sha256: String,
    pub bytes: u64,
}

/// Content inventory of the packaged tree. Carries no timestamp, so it changes
/// only when the files do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub spec_version: String,
    pub files: Vec<ManifestEntry>,
}

/// Hash every file under each existing root. Entry paths are relative to
/// `base` and sorted.
pub fn build_manifest<P: AsRef<Path>>(base: &Path, roots: &[P]) -> Result<Manifest> {
    let mut files = Vec::new();
    for root in roots {
        let dir = base.join(root.as_ref());
        if !dir.is_dir() {
            log::debug!("Manifest root {} absent; skipping", dir.display());
            continue;
        }
        for path in collect_files(&dir)? {
            let (sha256, bytes) = hash_file(&path)?;
            files.push(ManifestEntry {
                path: relative_slash_path(base, &path)?,
                sha256,
                bytes,
            });
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);

    Ok(Manifest {
        spec_version: MANIFEST_VERSION.to_string(),
        files,
    })
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(manifest)?)?;
    log::info!(
        "Wrote {} ({} files)",
        path.display(),
        manifest.files.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(base: &Path, rel: &str, content: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn manifest_lists_sorted_relative_entries() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        write(base, "out/flows/b/README.md", "# B");
        write(base, "agents/outputs/z.json", "{}");
        write(base, "out/flows/a.zip", "zip");
        write(base, "out/master.zip", "not included");

        let manifest = build_manifest(base, &DEFAULT_MANIFEST_ROOTS).unwrap();
        let paths: Vec<&str> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["agents/outputs/z.json", "out/flows/a.zip", "out/flows/b/README.md"]
        );
        assert_eq!(manifest.spec_version, "3.1.0");
        assert_eq!(manifest.files[0].bytes, 2);
    }

    #[test]
    fn manifest_is_stable_and_tracks_content() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        write(base, "out/flows/a/README.md", "# A");

        let first = build_manifest(base, &DEFAULT_MANIFEST_ROOTS).unwrap();
        let second = build_manifest(base, &DEFAULT_MANIFEST_ROOTS).unwrap();
        assert_eq!(first, second);

        write(base, "out/flows/a/README.md", "# A!");
        let changed = build_manifest(base, &DEFAULT_MANIFEST_ROOTS).unwrap();
        assert_ne!(first.files[0].sha256, changed.files[0].sha256);
    }

    #[test]
    fn missing_roots_yield_empty_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = build_manifest(temp.path(), &DEFAULT_MANIFEST_ROOTS).unwrap();
        assert!(manifest.files.is_empty());

        let target = temp.path().join("out/manifest.json");
        write_manifest(&target, &manifest).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(target).unwrap()).unwrap();
        assert_eq!(value["spec_version"], "3.1.0");
        assert!(value.get("created").is_none());
    }
}
