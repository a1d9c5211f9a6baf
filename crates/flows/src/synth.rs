use harvest_protocol::{Deliverable, DeliverableKind, Flow, FlowMessage, Message};
use std::collections::HashSet;

/// Step budget quoted in the generated prompt; matches the agent gate default.
pub const PROMPT_STEP_GATE: u32 = 25;

const DOCS_PATH: &str = "docs/overview.md";
const PROMPT_PATH: &str = "prompts/flow_compiler.txt";
const CODE_PATH: &str = "src/runner.rs";
const KEY_POINTS_LIMIT: usize = 10;
const KEY_POINT_CHARS: usize = 120;

/// Markdown overview: counts, roles and up to ten key points.
#[must_use]
pub fn build_docs(flow_title: &str, messages: &[FlowMessage]) -> Deliverable {
    let mut roles: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for message in messages {
        if seen.insert(message.role) {
            roles.push(message.role.as_str());
        }
    }

    let mut lines = vec![
        format!("# {flow_title}"),
        "## Summary".to_string(),
        format!("- Messages: {}", messages.len()),
        format!("- Roles: {}", roles.join(", ")),
        "## Key Points".to_string(),
    ];
    lines.extend(messages.iter().take(KEY_POINTS_LIMIT).map(|message| {
        let first_line: String = message
            .text
            .split('\n')
            .next()
            .unwrap_or_default()
            .chars()
            .take(KEY_POINT_CHARS)
            .collect();
        format!("- **{}**: {first_line}", message.role.tag())
    }));

    Deliverable {
        path: DOCS_PATH.to_string(),
        kind: DeliverableKind::Doc,
        content: lines.join("\n"),
    }
}

/// Instruction block for a downstream generator, followed by every message.
#[must_use]
pub fn build_prompt(flow_title: &str, messages: &[FlowMessage]) -> Deliverable {
    let mut lines = vec![
        format!(
            "You are a context-compiler. Task: generate all artefacts required for \"{flow_title}\"."
        ),
        format!(
            "Constraints: deterministic output order; no placeholders; gate at {PROMPT_STEP_GATE} steps; JSON logs."
        ),
        "Inputs: conversation snippets below.".to_string(),
        "---".to_string(),
    ];
    lines.extend(
        messages
            .iter()
            .map(|message| format!("[{}] {}", message.role.tag(), message.text)),
    );

    Deliverable {
        path: PROMPT_PATH.to_string(),
        kind: DeliverableKind::Prompt,
        content: lines.join("\n"),
    }
}

/// Minimal runnable scaffold proving the pipeline can emit code.
#[must_use]
pub fn build_code(flow_id: &str) -> Deliverable {
    let content = format!(
        "//! Generated scaffold for flow `{flow_id}`.\n\
         \n\
         pub fn run() {{\n    println!(\"Flow {flow_id}: hello, world\");\n}}\n\
         \n\
         fn main() {{\n    run();\n}}\n"
    );
    Deliverable {
        path: CODE_PATH.to_string(),
        kind: DeliverableKind::Code,
        content,
    }
}

/// Member messages of `flow`, in conversation order.
#[must_use]
pub fn messages_for_flow(flow: &Flow, messages: &[Message]) -> Vec<FlowMessage> {
    let ids: HashSet<&str> = flow.message_ids().iter().map(String::as_str).collect();
    messages
        .iter()
        .filter(|message| ids.contains(message.id.as_str()))
        .map(FlowMessage::from)
        .collect()
}

/// Append docs, prompt and code deliverables to `flow`, in that order.
pub fn synthesize(flow: &mut Flow, messages: &[FlowMessage]) {
    flow.deliverables.push(build_docs(&flow.title, messages));
    flow.deliverables.push(build_prompt(&flow.title, messages));
    flow.deliverables.push(build_code(&flow.id));
    log::debug!(
        "Synthesized {} deliverables for flow '{}'",
        flow.deliverables.len(),
        flow.id
    );
}
