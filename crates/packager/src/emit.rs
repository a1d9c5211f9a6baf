use crate::error::{PackagerError, Result};
use harvest_protocol::{serialize_json_pretty, Flow, FlowSummary};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_OUTPUT_ROOT: &str = "out";

const README_FILE: &str = "README.md";
const METRICS_FILE: &str = "metrics.json";

/// Paths of the output tree:
///
/// ```text
/// <root>/
///   flows/<id>/README.md, <deliverables>, metrics.json
///   flows/<id>.zip
///   master.zip
///   manifest.json
///   metrics.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_ROOT)
    }
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn flows_dir(&self) -> PathBuf {
        self.root.join("flows")
    }

    #[must_use]
    pub fn flow_dir(&self, flow_id: &str) -> PathBuf {
        self.flows_dir().join(flow_id)
    }

    #[must_use]
    pub fn flow_zip(&self, flow_id: &str) -> PathBuf {
        self.flows_dir().join(format!("{flow_id}.zip"))
    }

    #[must_use]
    pub fn master_zip(&self) -> PathBuf {
        self.root.join("master.zip")
    }

    #[must_use]
    pub fn manifest(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    #[must_use]
    pub fn metrics(&self) -> PathBuf {
        self.root.join(METRICS_FILE)
    }
}

/// Deliverable paths must stay inside the flow directory.
fn checked_relative(path: &str) -> Result<&Path> {
    let relative = Path::new(path);
    let safe = !path.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if safe {
        Ok(relative)
    } else {
        Err(PackagerError::UnsafePath(path.to_string()))
    }
}

/// Write the README and every deliverable of `flow`; returns the flow directory.
///
/// All deliverable paths are checked before anything is written.
pub fn write_deliverables(layout: &OutputLayout, flow: &Flow) -> Result<PathBuf> {
    let relatives = flow
        .deliverables
        .iter()
        .map(|deliverable| checked_relative(&deliverable.path))
        .collect::<Result<Vec<_>>>()?;

    let base = layout.flow_dir(&flow.id);
    fs::create_dir_all(&base)?;

    let readme = format!(
        "# {}\n\nAuto-generated deliverables for flow \"{}\".\n",
        flow.title, flow.id
    );
    fs::write(base.join(README_FILE), readme)?;

    for (deliverable, relative) in flow.deliverables.iter().zip(relatives) {
        let destination = base.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, &deliverable.content)?;
    }

    log::debug!(
        "Wrote {} deliverables for flow '{}' to {}",
        flow.deliverables.len(),
        flow.id,
        base.display()
    );
    Ok(base)
}

/// Remove `flows/` left by a previous build so the tree reflects one input only.
pub fn clear_flows(layout: &OutputLayout) -> Result<()> {
    let dir = layout.flows_dir();
    match fs::remove_dir_all(&dir) {
        Ok(()) => {
            log::debug!("Cleared previous flows under {}", dir.display());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn check_metrics(summary: &FlowSummary) -> Result<()> {
    if summary.metrics.is_within_bounds() {
        Ok(())
    } else {
        Err(PackagerError::MetricsOutOfRange(summary.flow_id.clone()))
    }
}

/// `flows/<id>/metrics.json`
pub fn write_flow_summary(layout: &OutputLayout, summary: &FlowSummary) -> Result<PathBuf> {
    check_metrics(summary)?;
    let base = layout.flow_dir(&summary.flow_id);
    fs::create_dir_all(&base)?;
    let target = base.join(METRICS_FILE);
    fs::write(&target, serialize_json_pretty(summary)?)?;
    Ok(target)
}

/// Aggregate `metrics.json` at the output root, one row per flow.
pub fn write_summaries(layout: &OutputLayout, summaries: &[FlowSummary]) -> Result<PathBuf> {
    summaries.iter().try_for_each(check_metrics)?;
    fs::create_dir_all(layout.root())?;
    let target = layout.metrics();
    fs::write(&target, serialize_json_pretty(&summaries)?)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_protocol::{Deliverable, DeliverableKind, FlowMetrics};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn flow_with(paths: &[&str]) -> Flow {
        Flow {
            id: "deploy-api".to_string(),
            title: "Deploy API".to_string(),
            nodes: vec![],
            deliverables: paths
                .iter()
                .map(|path| Deliverable {
                    path: (*path).to_string(),
                    kind: DeliverableKind::Doc,
                    content: format!("content of {path}"),
                })
                .collect(),
            metrics: FlowMetrics::initial(),
        }
    }

    #[test]
    fn layout_paths() {
        let layout = OutputLayout::default();
        assert_eq!(layout.flow_dir("x"), PathBuf::from("out/flows/x"));
        assert_eq!(layout.flow_zip("x"), PathBuf::from("out/flows/x.zip"));
        assert_eq!(layout.master_zip(), PathBuf::from("out/master.zip"));
        assert_eq!(layout.metrics(), PathBuf::from("out/metrics.json"));
    }

    #[test]
    fn writes_readme_and_nested_deliverables() {
        let temp = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp.path().join("out"));
        let flow = flow_with(&["docs/overview.md", "src/runner.rs"]);

        let dir = write_deliverables(&layout, &flow).unwrap();

        assert_eq!(
            fs::read_to_string(dir.join("README.md")).unwrap(),
            "# Deploy API\n\nAuto-generated deliverables for flow \"deploy-api\".\n"
        );
        assert_eq!(
            fs::read_to_string(dir.join("docs/overview.md")).unwrap(),
            "content of docs/overview.md"
        );
        assert!(dir.join("src/runner.rs").is_file());
    }

    #[test]
    fn rejects_escaping_paths_before_writing() {
        let temp = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp.path().join("out"));

        for bad in ["../evil.md", "/etc/passwd", "docs/../../x", ""] {
            let flow = flow_with(&["docs/ok.md", bad]);
            let err = write_deliverables(&layout, &flow).unwrap_err();
            assert!(matches!(err, PackagerError::UnsafePath(_)), "{bad}");
        }
        assert!(!layout.flow_dir("deploy-api").exists());
    }

    #[test]
    fn writes_per_flow_and_aggregate_metrics() {
        let temp = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp.path().join("out"));
        let summary = FlowSummary::from(&flow_with(&[]));

        let per_flow = write_flow_summary(&layout, &summary).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(per_flow).unwrap()).unwrap();
        assert_eq!(value["flowId"], "deploy-api");
        assert_eq!(value["qualityScore"], 0.94);

        let aggregate = write_summaries(&layout, &[summary.clone(), summary]).unwrap();
        let rows: Vec<FlowSummary> =
            serde_json::from_str(&fs::read_to_string(aggregate).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn out_of_range_metrics_are_refused() {
        let temp = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp.path().join("out"));
        let mut summary = FlowSummary::from(&flow_with(&[]));
        summary.metrics.user_rating = 1.2;

        let err = write_flow_summary(&layout, &summary).unwrap_err();
        assert!(matches!(err, PackagerError::MetricsOutOfRange(ref id) if id == "deploy-api"));
        assert!(!layout.flow_dir("deploy-api").join("metrics.json").exists());

        let err = write_summaries(&layout, &[summary]).unwrap_err();
        assert!(matches!(err, PackagerError::MetricsOutOfRange(_)));
        assert!(!layout.metrics().exists());
    }

    #[test]
    fn clear_flows_removes_previous_build() {
        let temp = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp.path().join("out"));
        clear_flows(&layout).unwrap();

        write_deliverables(&layout, &flow_with(&["docs/a.md"])).unwrap();
        fs::write(layout.flow_zip("deploy-api"), b"zip").unwrap();
        fs::write(layout.metrics(), "[]").unwrap();

        clear_flows(&layout).unwrap();
        assert!(!layout.flows_dir().exists());
        assert!(layout.metrics().is_file());
    }
}
