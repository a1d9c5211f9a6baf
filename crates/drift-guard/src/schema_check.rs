use crate::error::{DriftError, Result};
use crate::report::{GuardCheck, GuardReport};
use crate::settings::DriftSettings;
use harvest_packager::{collect_files, relative_slash_path};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const SCHEMA_PATH: &str = "schema/deliverable.schema.json";

/// Compile a Draft 7 schema.
pub fn compile_schema(schema: &Value) -> Result<JSONSchema> {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|e| DriftError::InvalidSchema(e.to_string()))
}

/// Validation messages for `instance`; empty when it conforms.
#[must_use]
pub fn schema_errors(schema: &JSONSchema, instance: &Value) -> Vec<String> {
    match schema.validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect(),
    }
}

fn load_schema(base: &Path) -> Result<JSONSchema> {
    let path = base.join(SCHEMA_PATH);
    if !path.is_file() {
        return Err(DriftError::MissingSchema(path));
    }
    let schema: Value = serde_json::from_str(&fs::read_to_string(&path)?)
        .map_err(|e| DriftError::InvalidSchema(format!("{}: {e}", path.display())))?;
    compile_schema(&schema)
}

/// Validate every `*.json` under the configured schema roots against
/// `schema/deliverable.schema.json`. Parse and validation failures are
/// aggregated per file.
pub fn validate_outputs(base: &Path, settings: &DriftSettings) -> Result<GuardReport> {
    let schema = load_schema(base)?;
    let mut report = GuardReport::new(GuardCheck::Schema);

    for root in settings.schema_roots() {
        let dir = base.join(&root);
        if !dir.is_dir() {
            log::debug!("Schema root {} absent; skipping", dir.display());
            continue;
        }

        for path in collect_files(&dir)? {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            report.checked += 1;
            let display = relative_slash_path(base, &path)
                .unwrap_or_else(|_| path.display().to_string());

            let bytes = fs::read(&path).map_err(|source| DriftError::ReadFailed {
                path: path.clone(),
                source,
            })?;
            let instance: Value = match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    report.fail(display, format!("bad JSON: {err}"));
                    continue;
                }
            };

            let errors = schema_errors(&schema, &instance);
            if !errors.is_empty() {
                report.fail(display, errors.join("; "));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_protocol::deliverable_schema_pretty;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(base: &Path, rel: &str, content: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn workspace_with_schema() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(temp.path(), SCHEMA_PATH, &deliverable_schema_pretty().unwrap());
        temp
    }

    #[test]
    fn conforming_outputs_pass() {
        let temp = workspace_with_schema();
        write(
            temp.path(),
            "agents/outputs/run/deliverable.json",
            r##"{"path":"docs/a.md","kind":"doc","content":"# A"}"##,
        );
        write(temp.path(), "agents/outputs/run/notes.md", "not json, not checked");

        let report = validate_outputs(temp.path(), &DriftSettings::default()).unwrap();
        assert_eq!(report.checked, 1);
        assert!(report.passed(), "{report}");
    }

    #[test]
    fn invalid_and_malformed_outputs_are_aggregated() {
        let temp = workspace_with_schema();
        write(temp.path(), "agents/outputs/a.json", r#"{"path":"x","kind":"video"}"#);
        write(temp.path(), "agents/outputs/b.json", "{ truncated");
        write(
            temp.path(),
            "agents/outputs/c.json",
            r#"{"path":"x","kind":"code","content":""}"#,
        );

        let report = validate_outputs(temp.path(), &DriftSettings::default()).unwrap();
        assert_eq!(report.checked, 3);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(failed, vec!["agents/outputs/a.json", "agents/outputs/b.json"]);
        assert!(report.failures[1].detail.starts_with("bad JSON"));
        assert_eq!(report.exit_code(), 3);
    }

    #[test]
    fn undecodable_json_is_reported_alongside_other_failures() {
        let temp = workspace_with_schema();
        let path = temp.path().join("agents/outputs/a.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{\"path\":\"\xff\"}").unwrap();
        write(temp.path(), "agents/outputs/b.json", "{ broken");

        let report = validate_outputs(temp.path(), &DriftSettings::default()).unwrap();
        assert_eq!(report.checked, 2);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(failed, vec!["agents/outputs/a.json", "agents/outputs/b.json"]);
        assert!(report.failures.iter().all(|f| f.detail.starts_with("bad JSON")));
    }

    #[test]
    fn absolute_schema_root_outside_base_is_checked() {
        let temp = workspace_with_schema();
        let elsewhere = TempDir::new().unwrap();
        write(elsewhere.path(), "run/bad.json", r#"{"path":"x","kind":"video"}"#);

        let settings = DriftSettings {
            schema_roots: Some(vec![elsewhere.path().to_path_buf()]),
            ..DriftSettings::default()
        };
        let report = validate_outputs(temp.path(), &settings).unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].path,
            elsewhere.path().join("run/bad.json").display().to_string()
        );
    }

    #[test]
    fn missing_schema_is_a_hard_error() {
        let temp = TempDir::new().unwrap();
        let err = validate_outputs(temp.path(), &DriftSettings::default()).unwrap_err();
        assert!(matches!(err, DriftError::MissingSchema(_)));
    }

    #[test]
    fn schema_errors_report_instance_path() {
        let schema = compile_schema(&serde_json::json!({
            "type": "object",
            "properties": { "steps": { "type": "integer" } }
        }))
        .unwrap();
        let errors = schema_errors(&schema, &serde_json::json!({ "steps": "many" }));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("at /steps"), "{}", errors[0]);
    }
}
