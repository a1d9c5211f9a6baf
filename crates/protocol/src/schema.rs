use crate::error::Result;
use crate::flow::Deliverable;
use schemars::schema_for;
use serde_json::Value;

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// JSON Schema of a single deliverable, pinned to Draft 7 so the drift guard
/// validator compiles it without draft negotiation.
pub fn deliverable_schema() -> Result<Value> {
    let schema = schema_for!(Deliverable);
    let mut value = serde_json::to_value(&schema)?;
    if let Value::Object(map) = &mut value {
        map.insert("$schema".to_string(), Value::String(DRAFT_07.to_string()));
    }
    Ok(value)
}

pub fn deliverable_schema_pretty() -> Result<String> {
    let value = deliverable_schema()?;
    Ok(serde_json::to_string_pretty(&value)?)
}
