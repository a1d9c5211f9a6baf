//! # HarvestFlow Packager
//!
//! Materializes flows on disk and turns the output tree into shippable,
//! reproducible artifacts.
//!
//! ## Architecture
//!
//! ```text
//! Flow[]
//!     │
//!     ├──> Emit: out/flows/<id>/{README.md, deliverables, metrics.json}
//!     │
//!     ├──> Archive
//!     │      ├─ out/flows/<id>.zip   (sorted entries, fixed timestamps)
//!     │      └─ out/master.zip       (every per-flow archive)
//!     │
//!     ├──> Manifest: out/manifest.json (SHA-256 + size per file)
//!     │
//!     └──> Release: releases/harvestflow-<label>/
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use harvest_packager::{write_deliverables, zip_flow, zip_master, OutputLayout};
//! # fn run(flow: &harvest_protocol::Flow) -> harvest_packager::Result<()> {
//! let layout = OutputLayout::default();
//! write_deliverables(&layout, flow)?;
//! zip_flow(&layout, &flow.id)?;
//! zip_master(&layout)?;
//! # Ok(())
//! # }
//! ```

mod archive;
mod emit;
mod error;
mod files;
mod manifest;
mod release;

pub use archive::{
    bundle_outputs, zip_directory, zip_flow, zip_master, OUTPUTS_BUNDLE, OUTPUTS_DIR,
};
pub use emit::{
    clear_flows, write_deliverables, write_flow_summary, write_summaries, OutputLayout,
    DEFAULT_OUTPUT_ROOT,
};
pub use error::{PackagerError, Result};
pub use files::{collect_files, hash_file, relative_slash_path, sha256_hex};
pub use manifest::{
    build_manifest, write_manifest, Manifest, ManifestEntry, DEFAULT_MANIFEST_ROOTS,
    MANIFEST_VERSION,
};
pub use release::{stage_release, ReleaseBundle, DEFAULT_RELEASES_DIR};
