//! # HarvestFlow Protocol
//!
//! Shared types for the HarvestFlow pipeline: the ingested conversation, the
//! intermediate topics produced by clustering, and the flows that carry the
//! synthesized deliverables and their quality metrics.
//!
//! ## Pipeline
//!
//! ```text
//! chat.json
//!     │
//!     ├──> ChatExport (validated on load)
//!     │      └─> Message[]
//!     │
//!     ├──> Topic[] (clustering)
//!     │
//!     └──> Flow[] (builder + synthesizers)
//!            └─> FlowSummary (quality score)
//! ```

mod error;
mod flow;
mod ingest;
mod message;
mod schema;

pub use error::{ProtocolError, Result};
pub use flow::{
    quality_score, Deliverable, DeliverableKind, Flow, FlowMetrics, FlowNode, FlowSummary,
    NodeKind, Topic,
};
pub use ingest::{load_chat, parse_chat};
pub use message::{ChatExport, FlowMessage, Message, Role};
pub use schema::{deliverable_schema, deliverable_schema_pretty};

use serde::Serialize;

/// Pretty JSON used for every artifact written to the output tree.
pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
