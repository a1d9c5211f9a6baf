use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Intermediate clustering result: a title and the message ids it claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Topic,
    Decision,
    Deliverable,
    Evidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub msg_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliverableKind {
    Doc,
    Prompt,
    Code,
    Config,
    Zip,
}

/// A generated artifact, written at `path` relative to its flow directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Deliverable {
    pub path: String,
    pub kind: DeliverableKind,
    pub content: String,
}

/// Per-flow scoring inputs, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetrics {
    pub task_success_rate: f64,
    pub efficiency_score: f64,
    pub automated_gate_score: f64,
    pub user_rating: f64,
}

impl FlowMetrics {
    /// Placeholder scores assigned to every freshly built flow.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            task_success_rate: 1.0,
            efficiency_score: 0.8,
            automated_gate_score: 1.0,
            user_rating: 0.9,
        }
    }

    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        [
            self.task_success_rate,
            self.efficiency_score,
            self.automated_gate_score,
            self.user_rating,
        ]
        .iter()
        .all(|value| (0.0..=1.0).contains(value))
    }
}

impl Default for FlowMetrics {
    fn default() -> Self {
        Self::initial()
    }
}

const WEIGHT_USER: f64 = 0.30;
const WEIGHT_AUTOMATED_GATE: f64 = 0.30;
const WEIGHT_SUCCESS: f64 = 0.25;
const WEIGHT_EFFICIENCY: f64 = 0.15;

/// Weighted quality score, rounded to three decimals.
#[must_use]
pub fn quality_score(metrics: &FlowMetrics) -> f64 {
    let score = WEIGHT_USER * metrics.user_rating
        + WEIGHT_AUTOMATED_GATE * metrics.automated_gate_score
        + WEIGHT_SUCCESS * metrics.task_success_rate
        + WEIGHT_EFFICIENCY * metrics.efficiency_score;
    (score * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Flow {
    pub id: String,
    pub title: String,
    pub nodes: Vec<FlowNode>,
    pub deliverables: Vec<Deliverable>,
    pub metrics: FlowMetrics,
}

impl Flow {
    /// Message ids held by the root topic node, in claim order.
    #[must_use]
    pub fn message_ids(&self) -> &[String] {
        self.nodes
            .first()
            .map(|node| node.msg_ids.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn quality_score(&self) -> f64 {
        quality_score(&self.metrics)
    }
}

/// Row written to `metrics.json`, one per flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub flow_id: String,
    pub title: String,
    pub quality_score: f64,
    pub metrics: FlowMetrics,
}

impl From<&Flow> for FlowSummary {
    fn from(flow: &Flow) -> Self {
        Self {
            flow_id: flow.id.clone(),
            title: flow.title.clone(),
            quality_score: flow.quality_score(),
            metrics: flow.metrics,
        }
    }
}
