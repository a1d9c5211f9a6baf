use crate::config::ClusterConfig;
use crate::error::Result;
use crate::stats::ClusterStats;
use harvest_protocol::{Message, Role, Topic};
use harvest_vector_store::{HashEmbedder, VectorIndex};
use serde_json::json;
use std::collections::HashSet;
use std::time::Instant;

/// Seed-and-neighbour clusterer over an injected vector index.
pub struct TopicClusterer {
    index: Box<dyn VectorIndex>,
    embedder: HashEmbedder,
    config: ClusterConfig,
}

struct Seed<'a> {
    id: &'a str,
    title: String,
}

impl TopicClusterer {
    pub fn new(index: Box<dyn VectorIndex>) -> Self {
        Self::with_config(index, ClusterConfig::default())
    }

    pub fn with_config(index: Box<dyn VectorIndex>, config: ClusterConfig) -> Self {
        Self {
            index,
            embedder: HashEmbedder::for_messages(),
            config,
        }
    }

    #[must_use]
    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub async fn cluster(&mut self, messages: &[Message]) -> Result<Vec<Topic>> {
        let (topics, _) = self.cluster_with_stats(messages).await?;
        Ok(topics)
    }

    /// Cluster `messages` into topics.
    ///
    /// Output is a function of input order: seeds are taken in order and each
    /// message id goes to the first topic that claims it.
    pub async fn cluster_with_stats(
        &mut self,
        messages: &[Message],
    ) -> Result<(Vec<Topic>, ClusterStats)> {
        self.config.validate()?;
        let started = Instant::now();
        let mut stats = ClusterStats {
            messages: messages.len(),
            ..ClusterStats::default()
        };

        let mut indexed_ids: HashSet<&str> = HashSet::with_capacity(messages.len());
        for message in messages {
            if message.role == Role::Tool {
                stats.skipped_tool += 1;
                continue;
            }
            let text = message.body();
            self.index
                .upsert(
                    &message.id,
                    self.embedder.embed(text),
                    json!({ "role": message.role, "text": text }),
                )
                .await?;
            indexed_ids.insert(message.id.as_str());
        }
        stats.indexed = indexed_ids.len();

        let seeds = self.select_seeds(messages);
        stats.seeds = seeds.len();
        log::debug!(
            "Indexed {} messages, selected {} seeds",
            stats.indexed,
            stats.seeds
        );

        let mut candidates: Vec<Topic> = Vec::with_capacity(seeds.len());
        for seed in &seeds {
            // Entries left in a persisted index by earlier runs must not take neighbour slots.
            let in_conversation = |id: &str| indexed_ids.contains(id);
            let hits = self
                .index
                .query_where(
                    &self.embedder.embed(&seed.title),
                    self.config.neighbors,
                    &in_conversation,
                )
                .await?;

            let mut seen = HashSet::with_capacity(hits.len() + 1);
            let mut ids = Vec::with_capacity(hits.len() + 1);
            for id in std::iter::once(seed.id).chain(hits.iter().map(|hit| hit.id.as_str())) {
                if indexed_ids.contains(id) && seen.insert(id) {
                    ids.push(id.to_string());
                }
            }
            candidates.push(Topic {
                title: seed.title.clone(),
                ids,
            });
        }

        let topics = resolve_overlaps(candidates);
        stats.topics = topics.len();
        stats.claimed = topics.iter().map(|t| t.ids.len()).sum();
        stats.empty_topics = topics.iter().filter(|t| t.ids.is_empty()).count();
        stats.time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        log::info!(
            "Clustered {} messages into {} topics ({} ids claimed)",
            stats.messages,
            stats.topics,
            stats.claimed
        );
        Ok((topics, stats))
    }

    fn select_seeds<'a>(&self, messages: &'a [Message]) -> Vec<Seed<'a>> {
        messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| Seed {
                id: m.id.as_str(),
                title: seed_title(m.body(), self.config.title_max_chars),
            })
            .filter(|seed| !seed.title.is_empty())
            .take(self.config.max_seeds)
            .collect()
    }
}

/// First line of `text`, cut to `max_chars` characters.
#[must_use]
pub fn seed_title(text: &str, max_chars: usize) -> String {
    text.split('\n')
        .next()
        .unwrap_or_default()
        .chars()
        .take(max_chars)
        .collect()
}

/// Each id stays with the first topic (in seed order) that lists it.
fn resolve_overlaps(candidates: Vec<Topic>) -> Vec<Topic> {
    let mut claimed: HashSet<String> = HashSet::new();
    candidates
        .into_iter()
        .map(|topic| Topic {
            title: topic.title,
            ids: topic
                .ids
                .into_iter()
                .filter(|id| claimed.insert(id.clone()))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_vector_store::{FileIndex, MemoryIndex};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn msg(id: &str, role: Role, text: &str) -> Message {
        Message {
            id: id.to_string(),
            timestamp: None,
            role,
            text: Some(text.to_string()),
            content: None,
            meta: None,
        }
    }

    fn clusterer(neighbors: usize) -> TopicClusterer {
        TopicClusterer::with_config(
            Box::new(MemoryIndex::new()),
            ClusterConfig {
                neighbors,
                ..ClusterConfig::default()
            },
        )
    }

    fn assert_partition(messages: &[Message], topics: &[Topic]) {
        let input: HashSet<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        let mut seen = HashSet::new();
        for topic in topics {
            for id in &topic.ids {
                assert!(input.contains(id.as_str()), "unknown id {id}");
                assert!(seen.insert(id.clone()), "id {id} claimed twice");
            }
        }
    }

    #[tokio::test]
    async fn no_user_messages_yield_no_topics() {
        let messages = vec![
            msg("1", Role::Assistant, "hello"),
            msg("2", Role::System, "be terse"),
        ];
        let topics = clusterer(50).cluster(&messages).await.unwrap();
        assert!(topics.is_empty());

        let topics = clusterer(50).cluster(&[]).await.unwrap();
        assert!(topics.is_empty());
    }

    #[tokio::test]
    async fn first_seed_claims_its_neighbourhood() {
        let messages = vec![
            msg("u1", Role::User, "Deploy the API to staging"),
            msg("a1", Role::Assistant, "Staging deploy done"),
            msg("u2", Role::User, "Write release notes"),
            msg("a2", Role::Assistant, "Notes drafted"),
        ];
        let topics = clusterer(50).cluster(&messages).await.unwrap();

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "Deploy the API to staging");
        assert_eq!(topics[0].ids[0], "u1");
        assert_eq!(topics[0].ids.len(), 4);
        // Everything was already claimed by the first seed.
        assert_eq!(topics[1].title, "Write release notes");
        assert!(topics[1].ids.is_empty());
        assert_partition(&messages, &topics);
    }

    #[tokio::test]
    async fn narrow_neighbourhoods_split_topics() {
        let messages = vec![
            msg("u1", Role::User, "deploy api staging"),
            msg("a1", Role::Assistant, "deploy api staging finished"),
            msg("u2", Role::User, "write release notes"),
            msg("a2", Role::Assistant, "release notes written"),
        ];
        let topics = clusterer(2).cluster(&messages).await.unwrap();

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].ids, vec!["u1", "a1"]);
        assert_eq!(topics[1].ids, vec!["u2", "a2"]);
        assert_partition(&messages, &topics);
    }

    #[tokio::test]
    async fn tool_messages_are_never_claimed() {
        let messages = vec![
            msg("u1", Role::User, "run the tests"),
            msg("t1", Role::Tool, "run the tests: 42 passed"),
            msg("a1", Role::Assistant, "all green"),
        ];
        let mut clusterer = clusterer(50);
        let (topics, stats) = clusterer.cluster_with_stats(&messages).await.unwrap();

        assert_eq!(stats.skipped_tool, 1);
        assert_eq!(stats.indexed, 2);
        assert_eq!(clusterer.index().len(), 2);
        assert!(topics.iter().all(|t| !t.ids.contains(&"t1".to_string())));
        assert_partition(&messages, &topics);
    }

    #[tokio::test]
    async fn seeds_are_capped_and_titles_trimmed() {
        let mut messages = Vec::new();
        for i in 0..15 {
            messages.push(msg(&format!("u{i}"), Role::User, &format!("topic {i}\nbody")));
        }
        messages.push(msg("blank", Role::User, "\nsecond line only"));
        let topics = clusterer(1).cluster(&messages).await.unwrap();

        assert_eq!(topics.len(), 12);
        assert_eq!(topics[0].title, "topic 0");
        assert_eq!(topics[11].title, "topic 11");
        assert_partition(&messages, &topics);
    }

    #[tokio::test]
    async fn blank_first_lines_are_not_seeds() {
        let messages = vec![
            msg("blank", Role::User, "\nsecond line only"),
            msg("empty", Role::User, ""),
            msg("real", Role::User, "real question"),
        ];
        let (topics, stats) = clusterer(50).cluster_with_stats(&messages).await.unwrap();
        assert_eq!(stats.seeds, 1);
        assert_eq!(topics[0].title, "real question");
        assert_eq!(topics[0].ids[0], "real");
    }

    #[test]
    fn seed_title_takes_first_line_and_truncates() {
        let long = "x".repeat(100);
        assert_eq!(seed_title(&long, 80).chars().count(), 80);
        assert_eq!(seed_title("first\nsecond", 80), "first");
        assert_eq!(seed_title("", 80), "");
        assert_eq!(seed_title("héllo wörld", 4), "héll");
    }

    #[tokio::test]
    async fn output_is_deterministic_for_fixed_order() {
        let messages: Vec<Message> = (0..20)
            .map(|i| {
                let role = if i % 7 == 0 { Role::User } else { Role::Assistant };
                msg(&format!("m{i}"), role, &format!("message number {i} about item {}", i % 3))
            })
            .collect();

        let first = clusterer(5).cluster(&messages).await.unwrap();
        let second = clusterer(5).cluster(&messages).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_partition(&messages, &first);
    }

    #[tokio::test]
    async fn stale_entries_from_a_persisted_index_are_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vector-store.json");

        let mut previous = FileIndex::new(&path);
        previous
            .upsert(
                "ghost",
                HashEmbedder::for_messages().embed("deploy the api"),
                json!({}),
            )
            .await
            .unwrap();

        let messages = vec![msg("u1", Role::User, "deploy the api")];
        let mut clusterer = TopicClusterer::new(Box::new(FileIndex::new(&path)));
        let topics = clusterer.cluster(&messages).await.unwrap();

        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].ids, vec!["u1"]);
    }

    #[tokio::test]
    async fn leftover_file_entries_do_not_crowd_out_members() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vector-store.json");
        let embedder = HashEmbedder::for_messages();

        let mut previous = FileIndex::new(&path);
        for i in 0..60 {
            previous
                .upsert(&format!("old-{i}"), embedder.embed("deploy the api"), json!({}))
                .await
                .unwrap();
        }

        let messages = vec![
            msg("u1", Role::User, "deploy the api"),
            msg("a1", Role::Assistant, "deploy the api now"),
        ];
        let from_file = TopicClusterer::new(Box::new(FileIndex::new(&path)))
            .cluster(&messages)
            .await
            .unwrap();
        let from_memory = clusterer(50).cluster(&messages).await.unwrap();

        assert_eq!(from_file[0].ids, vec!["u1", "a1"]);
        assert_eq!(from_file, from_memory);
    }
}
