use crate::error::{ProtocolError, Result};
use crate::message::ChatExport;
use std::collections::HashSet;
use std::path::Path;

/// Load and validate a conversation export. Any structural problem fails the
/// whole load; nothing is partially accepted.
pub fn load_chat(path: impl AsRef<Path>) -> Result<ChatExport> {
    let path = path.as_ref();
    log::info!("Loading conversation export from {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    parse_chat(&raw)
}

pub fn parse_chat(raw: &str) -> Result<ChatExport> {
    let export: ChatExport = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(export.messages.len());
    for (index, message) in export.messages.iter().enumerate() {
        if message.id.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage {
                index,
                reason: "id must not be empty".to_string(),
            });
        }
        if !seen.insert(message.id.as_str()) {
            return Err(ProtocolError::InvalidMessage {
                index,
                reason: format!("duplicate id '{}'", message.id),
            });
        }
    }

    log::debug!("Parsed {} messages", export.messages.len());
    Ok(export)
}
