use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_PATH: &str = "drift/settings.json";

pub const DEFAULT_EDIT_BUDGET_PCT: f64 = 0.03;
pub const DEFAULT_SEMANTIC_MIN_SIM: f64 = 0.93;
pub const DEFAULT_LIVE_ROOT: &str = "agents/outputs";
pub const DEFAULT_GOLDEN_ROOT: &str = "snapshots/golden";

/// Thresholds and roots shared by the drift checks. Every field is optional
/// in `drift/settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriftSettings {
    /// Allowed edit distance as a fraction of the golden file's length.
    #[serde(alias = "snapshotEditBudgetPct")]
    pub edit_budget_pct: f64,

    pub semantic_min_sim: f64,

    pub live_root: PathBuf,

    pub golden_root: PathBuf,

    /// Roots whose JSON outputs are schema-validated. Defaults to `live_root`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_roots: Option<Vec<PathBuf>>,

    /// Explicit `[golden, live]` pairs for the semantic guard, relative to the
    /// workspace base. When absent every golden snapshot is paired with its
    /// live counterpart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_pairs: Option<Vec<(PathBuf, PathBuf)>>,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            edit_budget_pct: DEFAULT_EDIT_BUDGET_PCT,
            semantic_min_sim: DEFAULT_SEMANTIC_MIN_SIM,
            live_root: PathBuf::from(DEFAULT_LIVE_ROOT),
            golden_root: PathBuf::from(DEFAULT_GOLDEN_ROOT),
            schema_roots: None,
            semantic_pairs: None,
        }
    }
}

impl DriftSettings {
    /// Read `drift/settings.json` under `base`. A missing file yields defaults;
    /// an unreadable one is reported and also yields defaults.
    pub fn load(base: &Path) -> Self {
        let path = base.join(SETTINGS_PATH);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                log::warn!("Unable to read {}: {err}; using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Unable to parse {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn schema_roots(&self) -> Vec<PathBuf> {
        self.schema_roots
            .clone()
            .unwrap_or_else(|| vec![self.live_root.clone()])
    }
}
