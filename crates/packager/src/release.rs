use crate::archive::OUTPUTS_BUNDLE;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_RELEASES_DIR: &str = "releases";

const RELEASE_ARTIFACTS: [(&str, &str); 4] = [
    ("out/master.zip", "master.zip"),
    ("out/manifest.json", "manifest.json"),
    ("out/metrics.json", "metrics.json"),
    (OUTPUTS_BUNDLE, "all-llm-outputs.zip"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBundle {
    pub dir: PathBuf,
    /// File names copied into `dir`, in artifact order. `README.txt` excluded.
    pub copied: Vec<String>,
}

/// Copy the packaged artifacts that exist into `<releases_dir>/harvestflow-<label>/`
/// and describe them in a `README.txt`.
pub fn stage_release(base: &Path, releases_dir: &Path, label: &str) -> Result<ReleaseBundle> {
    let dir = base.join(releases_dir).join(format!("harvestflow-{label}"));
    fs::create_dir_all(&dir)?;

    let mut copied = Vec::new();
    for (source, name) in RELEASE_ARTIFACTS {
        let source = base.join(source);
        if !source.is_file() {
            log::debug!("{} not present; not staged", source.display());
            continue;
        }
        fs::copy(&source, dir.join(name))?;
        copied.push(name.to_string());
    }

    let mut readme = vec![
        "HarvestFlow Release Bundle".to_string(),
        format!("Label: {label}"),
        "Contents:".to_string(),
    ];
    readme.extend(copied.iter().map(|name| format!("- {name}")));
    readme.push(String::new());
    fs::write(dir.join("README.txt"), readme.join("\n"))?;

    log::info!("Release bundle staged at {}", dir.display());
    Ok(ReleaseBundle { dir, copied })
}
