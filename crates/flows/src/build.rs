use crate::slug::SlugAllocator;
use harvest_protocol::{Flow, FlowMetrics, FlowNode, NodeKind, Topic};

const ROOT_NODE_ID: &str = "root";
const FALLBACK_TITLE: &str = "Flow";

/// One flow per topic, in topic order.
#[must_use]
pub fn build_flows(topics: &[Topic]) -> Vec<Flow> {
    let mut slugs = SlugAllocator::new();
    topics
        .iter()
        .map(|topic| {
            let title = if topic.title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                topic.title.clone()
            };
            Flow {
                id: slugs.allocate(&topic.title),
                nodes: vec![FlowNode {
                    id: ROOT_NODE_ID.to_string(),
                    kind: NodeKind::Topic,
                    label: title.clone(),
                    parent_id: None,
                    msg_ids: topic.ids.clone(),
                }],
                title,
                deliverables: Vec::new(),
                metrics: FlowMetrics::initial(),
            }
        })
        .collect()
}
