use anyhow::{Context, Result};
use harvest_cluster::{ClusterConfig, ClusterStats, TopicClusterer};
use harvest_flows::{build_flows, messages_for_flow, synthesize};
use harvest_packager::{
    clear_flows, write_deliverables, write_flow_summary, write_summaries, zip_flow, zip_master,
    OutputLayout,
};
use harvest_protocol::{load_chat, FlowSummary};
use harvest_vector_store::VectorStoreConfig;
use std::path::PathBuf;

pub struct BuildOptions {
    pub input: PathBuf,
    pub layout: OutputLayout,
    pub vector_store: VectorStoreConfig,
    pub cluster: ClusterConfig,
}

#[derive(Debug)]
pub struct BuildSummary {
    pub flows: Vec<FlowSummary>,
    pub archives: usize,
    pub stats: ClusterStats,
}

/// Ingest → cluster → build → synthesize → emit → archive.
///
/// Ingestion is validated before anything is written.
pub async fn run_build(options: &BuildOptions) -> Result<BuildSummary> {
    let export = load_chat(&options.input)
        .with_context(|| format!("Failed to ingest {}", options.input.display()))?;
    log::info!(
        "Loaded {} messages from {}",
        export.messages.len(),
        options.input.display()
    );

    let mut clusterer =
        TopicClusterer::with_config(options.vector_store.open(), options.cluster.clone());
    let (topics, stats) = clusterer
        .cluster_with_stats(&export.messages)
        .await
        .context("Clustering failed")?;
    log::info!(
        "Clustered {} messages into {} topics ({} ids claimed, {}ms)",
        stats.messages,
        stats.topics,
        stats.claimed,
        stats.time_ms
    );

    let mut flows = build_flows(&topics);
    clear_flows(&options.layout).context("Failed to clear previous flows")?;
    let mut summaries = Vec::with_capacity(flows.len());
    for flow in &mut flows {
        let members = messages_for_flow(flow, &export.messages);
        synthesize(flow, &members);

        write_deliverables(&options.layout, flow)
            .with_context(|| format!("Failed to write flow '{}'", flow.id))?;
        let summary = FlowSummary::from(&*flow);
        write_flow_summary(&options.layout, &summary)?;
        zip_flow(&options.layout, &flow.id)?;
        summaries.push(summary);
    }

    write_summaries(&options.layout, &summaries)?;
    let archives = zip_master(&options.layout).context("Failed to write master archive")?;

    Ok(BuildSummary {
        flows: summaries,
        archives,
        stats,
    })
}
