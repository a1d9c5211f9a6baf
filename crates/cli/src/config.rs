use anyhow::{Context, Result};
use harvest_cluster::ClusterConfig;
use harvest_packager::DEFAULT_OUTPUT_ROOT;
use harvest_vector_store::VectorStoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "harvestflow.toml";

/// `harvestflow.toml`. Every table is optional; CLI flags override it.
///
/// ```toml
/// [vector_store]
/// backend = "file"
/// path = "out/vector-store.json"
///
/// [cluster]
/// max_seeds = 12
/// neighbors = 50
///
/// [output]
/// root = "out"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vector_store: VectorStoreConfig,
    pub cluster: ClusterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
        }
    }
}

impl AppConfig {
    /// Load `explicit` when given (it must exist), otherwise `<base>/harvestflow.toml`
    /// if present, otherwise defaults.
    pub fn load(base: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => base.join(path),
            None => {
                let path = base.join(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
