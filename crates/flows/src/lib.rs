//! # HarvestFlow Flows
//!
//! Turns clustered topics into flows and fills each flow with deliverables.
//!
//! ## Architecture
//!
//! ```text
//! Topic[]
//!     │
//!     ├──> Flow Builder
//!     │      ├─ slug id (collisions get -2, -3, ...)
//!     │      ├─ single root topic node
//!     │      └─ placeholder metrics
//!     │
//!     └──> Synthesizers (pure)
//!            ├─ docs/overview.md
//!            ├─ prompts/flow_compiler.txt
//!            └─ src/runner.rs
//! ```
//!
//! Every function here is deterministic: identical input yields byte-identical
//! output, which is what the drift guard relies on downstream.

mod build;
mod slug;
mod synth;

pub use build::build_flows;
pub use slug::{slugify, SlugAllocator, FALLBACK_SLUG};
pub use synth::{
    build_code, build_docs, build_prompt, messages_for_flow, synthesize, PROMPT_STEP_GATE,
};
