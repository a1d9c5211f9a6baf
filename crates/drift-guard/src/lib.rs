//! # HarvestFlow Drift Guard
//!
//! Post-hoc checks that compare what the pipeline produced now with what was
//! accepted before, plus the admission gate for agent runs.
//!
//! ## Checks
//!
//! ```text
//! drift/settings.json ──> DriftSettings
//!     │
//!     ├──> fingerprint   locked files vs. baseline hashes        exit 2
//!     ├──> schema        live JSON vs. deliverable schema        exit 3
//!     ├──> snapshot      golden vs. live, Levenshtein budget     exit 4
//!     └──> semantic      golden vs. live, hashed-embedding cos   exit 5
//!
//! run.json ──> AgentRun ──> GateVerdict (cost, steps, tools, alignment)
//! ```
//!
//! Each check returns a [`GuardReport`]; failures inside a check are
//! aggregated, never short-circuited. I/O errors abort the check.

mod agentic;
mod error;
mod fingerprint;
mod report;
mod schema_check;
mod semantic;
mod settings;
mod snapshot;

pub use agentic::{
    evaluate_agent_run, evaluate_with_limits, AgentRun, GateLimits, GatePredicate, GateVerdict,
    DEFAULT_MAX_COST_USD, DEFAULT_MAX_STEPS,
};
pub use error::{DriftError, Result};
pub use fingerprint::{
    check_fingerprints, compare_fingerprints, compute_fingerprints, load_fingerprints,
    write_fingerprints, FingerprintConfig, FingerprintDiff, FingerprintMap, BASELINE_PATH,
    CONFIG_PATH, CURRENT_PATH,
};
pub use report::{GuardCheck, GuardFailure, GuardReport};
pub use schema_check::{compile_schema, schema_errors, validate_outputs, SCHEMA_PATH};
pub use semantic::{semantic_guard, semantic_similarity};
pub use settings::{DriftSettings, SETTINGS_PATH};
pub use snapshot::{edit_budget, is_snapshot_file, levenshtein, save_snapshots, snapshot_diff};
