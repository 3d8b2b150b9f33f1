//! Graph Builder: spreadsheet rows → five-level graph.
//!
//! The import is a staged pipeline with explicit ordering:
//!
//! 1. **parse**: raw rows become typed records; unnamed, ineligible, or
//!    unknown-stream rows are skipped and counted
//! 2. **classify**: town, scores, taxonomy, tags, and optional summary,
//!    computed independently per record
//! 3. **group**: records grouped by (stream, plate, sub-category) in
//!    insertion order
//! 4. **write**: clear the store, seed the three level-1 stream nodes and
//!    their sequencing links, then upsert level 2-5 nodes per group
//!
//! Seeding precedes every level-2 upsert because level-2 nodes reference
//! their level-1 parent. The whole run is destructive: the graph is cleared
//! and rebuilt, and rank is recomputed for every group.

use crate::ingest::score::ScoreCard;
use crate::ingest::spreadsheet::SpreadsheetReader;
use crate::ingest::taxonomy::{Stream, Taxonomy};
use crate::ingest::town::{TownMatch, resolve_town};
use crate::llm::Summarizer;
use crate::models::node::{
    CATEGORY_ENTERPRISE, CATEGORY_TOWN, EdgeKind, EnterpriseFacts, GraphEdge, GraphNode,
    NodeLevel, plate_id, subcategory_id,
};
use crate::models::record::{EnterpriseRecord, RawRow};
use crate::storage::GraphStore;
use crate::Result;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::BufRead;

/// Outcome counters for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows read from the spreadsheet.
    pub rows_read: usize,
    /// Records written as level-4 nodes.
    pub imported: usize,
    /// Rows skipped (no name, ineligible, or unknown stream).
    pub skipped: usize,
    /// Records whose summarization call failed (degraded to empty).
    pub enrichment_failures: usize,
    /// Distinct (stream, plate, sub-category) groups.
    pub groups: usize,
}

/// One record after the classify stage.
struct ClassifiedRecord {
    record: EnterpriseRecord,
    stream: Stream,
    taxonomy: Taxonomy,
    town: TownMatch,
    scores: ScoreCard,
    tags: String,
    summary: String,
}

/// Service that builds the graph from spreadsheet rows.
pub struct ImportService<'a> {
    /// Target graph store.
    store: &'a dyn GraphStore,
    /// Optional summarization provider; `None` disables enrichment.
    summarizer: Option<&'a dyn Summarizer>,
}

impl<'a> ImportService<'a> {
    /// Creates an import service without enrichment.
    #[must_use]
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self {
            store,
            summarizer: None,
        }
    }

    /// Enables summarization enrichment.
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: &'a dyn Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Runs a full import from CSV input.
    ///
    /// # Errors
    ///
    /// Returns an error if the spreadsheet cannot be read or a store
    /// operation fails. Per-record failures never surface here.
    pub fn run<R: BufRead>(&self, reader: R) -> Result<ImportStats> {
        let rows = SpreadsheetReader::new(reader)?.read_all()?;
        self.import_rows(&rows)
    }

    /// Runs a full import over pre-read rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    pub fn import_rows(&self, rows: &[RawRow]) -> Result<ImportStats> {
        let mut stats = ImportStats {
            rows_read: rows.len(),
            ..ImportStats::default()
        };

        // parse + classify
        let mut group_order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<ClassifiedRecord>> = HashMap::new();

        for row in rows {
            let Some(record) = EnterpriseRecord::from_row(row) else {
                stats.skipped += 1;
                continue;
            };
            let Some(stream) = Stream::parse(&record.stream) else {
                tracing::warn!(name = %record.name, stream = %record.stream, "unknown stream, skipping record");
                stats.skipped += 1;
                continue;
            };

            let classified = self.classify(record, stream, &mut stats);
            let key = format!(
                "{}|{}|{}",
                stream.as_str(),
                classified.taxonomy.plate,
                classified.taxonomy.sub_category
            );
            if !groups.contains_key(&key) {
                group_order.push(key.clone());
            }
            groups.entry(key).or_default().push(classified);
            stats.imported += 1;
        }

        // write: clear, seed, then level 2+ upserts
        self.store.clear()?;
        self.seed_streams()?;

        for key in &group_order {
            if let Some(mut members) = groups.remove(key) {
                // stable sort keeps insertion order for equal scores
                members.sort_by(|a, b| {
                    b.scores
                        .composite
                        .partial_cmp(&a.scores.composite)
                        .unwrap_or(Ordering::Equal)
                });
                self.write_group(&members)?;
            }
        }
        stats.groups = group_order.len();

        tracing::info!(
            imported = stats.imported,
            skipped = stats.skipped,
            groups = stats.groups,
            "import complete"
        );
        Ok(stats)
    }

    /// Classify stage for one record.
    ///
    /// Every enrichment is independent; a summarization failure degrades
    /// to an empty summary and is counted, never propagated.
    fn classify(
        &self,
        record: EnterpriseRecord,
        stream: Stream,
        stats: &mut ImportStats,
    ) -> ClassifiedRecord {
        let taxonomy = Taxonomy::classify(stream, &record.sub_category);
        let town = resolve_town(&record.address, &record.name);
        let scores = ScoreCard::compute(&record.credentials, &record.capital, &record.confidence);
        let tags = record.tags();
        let summary = self.summarize(&record, stats);

        ClassifiedRecord {
            record,
            stream,
            taxonomy,
            town,
            scores,
            tags,
            summary,
        }
    }

    /// Calls the summarizer when there is material to summarize.
    fn summarize(&self, record: &EnterpriseRecord, stats: &mut ImportStats) -> String {
        let Some(summarizer) = self.summarizer else {
            return String::new();
        };
        if record.tech_text.is_empty() && record.main_products.is_empty() && record.intro.is_empty()
        {
            return String::new();
        }
        match summarizer.summarize(
            &record.name,
            &record.tech_text,
            &record.main_products,
            &record.intro,
        ) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(name = %record.name, error = %e, "summarization failed, continuing without");
                stats.enrichment_failures += 1;
                String::new()
            }
        }
    }

    /// Seeds the three level-1 stream nodes and their sequencing links.
    fn seed_streams(&self) -> Result<()> {
        for stream in Stream::all() {
            let name = stream.as_str();
            self.store
                .upsert_node(&GraphNode::new(name, NodeLevel::Stream, name))?;
        }
        for pair in Stream::all().windows(2) {
            self.store.upsert_edge(&GraphEdge::new(
                pair[0].as_str(),
                pair[1].as_str(),
                EdgeKind::Link,
            ))?;
        }
        Ok(())
    }

    /// Writes one ranked (stream, plate, sub-category) group.
    fn write_group(&self, members: &[ClassifiedRecord]) -> Result<()> {
        let Some(first) = members.first() else {
            return Ok(());
        };
        let stream = first.stream.as_str();
        let plate = &first.taxonomy.plate;
        let subcategory = &first.taxonomy.sub_category;

        let l2_id = plate_id(stream, plate);
        self.store.upsert_node(
            &GraphNode::new(&l2_id, NodeLevel::Plate, plate).with_parent(stream),
        )?;
        self.store
            .upsert_edge(&GraphEdge::new(stream, &l2_id, EdgeKind::Link))?;

        let l3_id = subcategory_id(stream, plate, subcategory);
        self.store.upsert_node(
            &GraphNode::new(&l3_id, NodeLevel::SubCategory, subcategory).with_parent(&l2_id),
        )?;
        self.store
            .upsert_edge(&GraphEdge::new(&l2_id, &l3_id, EdgeKind::Link))?;

        for (index, member) in members.iter().enumerate() {
            let rank = index + 1;
            self.write_enterprise(&l3_id, rank, member)?;
        }
        Ok(())
    }

    /// Writes one level-4 enterprise node and its town link.
    fn write_enterprise(&self, l3_id: &str, rank: usize, member: &ClassifiedRecord) -> Result<()> {
        let record = &member.record;
        let scores = &member.scores;

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
        let facts = EnterpriseFacts {
            code: format!("CODE{rank}"),
            rank: rank as i64,
            star_total: scores.star_total,
            star_tech: scores.star_tech,
            star_str: scores.star_strength,
            star_rel: scores.star_confidence,
            tech_text: record.tech_text.clone(),
            product_services: member.summary.clone(),
            scene_text: record.scene_text.clone(),
            intro: record.intro.clone(),
            legal: record.legal.clone(),
            capital: record.capital.clone(),
            date: record.founded.clone(),
            contact: record.contact.clone(),
            address: record.address.clone(),
            tags: member.tags.clone(),
            insured: record.insured.clone(),
            company_type: record.company_type.clone(),
            industry_stream: record.stream.clone(),
            sub_category: record.sub_category.clone(),
            confidence: scores.confidence as f64,
        };

        self.store.upsert_node(
            &GraphNode::new(&record.name, NodeLevel::Enterprise, &record.name)
                .with_category(CATEGORY_ENTERPRISE)
                .with_parent(l3_id)
                .with_facts(facts),
        )?;
        self.store
            .upsert_edge(&GraphEdge::new(l3_id, &record.name, EdgeKind::Link))?;

        // at most one town link per enterprise, and only for real towns
        if !member.town.is_unknown() {
            self.store.upsert_node(
                &GraphNode::new(&member.town.name, NodeLevel::Town, &member.town.name)
                    .with_category(CATEGORY_TOWN),
            )?;
            self.store.upsert_edge(&GraphEdge::new(
                &record.name,
                &member.town.name,
                EdgeKind::LocatedIn,
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::NoopSummarizer;
    use crate::models::record::fields;
    use crate::storage::InMemoryGraphStore;
    use crate::{Error, Result};

    fn row(name: &str, stream: &str, subcat: &str, confidence: &str) -> RawRow {
        let mut row = RawRow::new();
        row.set(fields::ELIGIBLE, "1");
        row.set(fields::NAME, name);
        row.set(fields::STREAM, stream);
        row.set(fields::SUB_CATEGORY, subcat);
        row.set(fields::CONFIDENCE, confidence);
        row
    }

    fn import(rows: &[RawRow]) -> (InMemoryGraphStore, ImportStats) {
        let store = InMemoryGraphStore::new();
        let stats = ImportService::new(&store).import_rows(rows).unwrap();
        (store, stats)
    }

    #[test]
    fn test_seeds_streams_before_groups() {
        let (store, stats) = import(&[]);
        assert_eq!(stats.imported, 0);

        let nodes = store.fetch_nodes(100).unwrap();
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["上游", "中游", "下游"]);

        let edges = store.fetch_edges().unwrap();
        assert!(edges.contains(&GraphEdge::new("上游", "中游", EdgeKind::Link)));
        assert!(edges.contains(&GraphEdge::new("中游", "下游", EdgeKind::Link)));
    }

    #[test]
    fn test_end_to_end_classification() {
        let mut r = row("示例公司", "下游", "居家养老：上门护理", "50");
        r.set(fields::CAPITAL, "500万");
        let (store, stats) = import(&[r]);
        assert_eq!(stats.imported, 1);
        assert_eq!(stats.groups, 1);

        let nodes = store.fetch_nodes(100).unwrap();
        let enterprise = nodes.iter().find(|n| n.id == "示例公司").unwrap();
        assert_eq!(enterprise.level, NodeLevel::Enterprise);
        assert_eq!(
            enterprise.parent.as_deref(),
            Some("下游-居家养老-上门护理")
        );
        assert!(nodes.iter().any(|n| n.id == "下游-居家养老"));
        assert!(nodes.iter().any(|n| n.id == "下游-居家养老-上门护理"));
    }

    #[test]
    fn test_rank_by_descending_composite() {
        // composite = 0.4 × confidence here; scores 10, 30, 20
        let rows = [
            row("公司甲", "上游", "传感器:雷达", "25"),
            row("公司乙", "上游", "传感器:雷达", "75"),
            row("公司丙", "上游", "传感器:雷达", "50"),
        ];
        let (store, _) = import(&rows);

        let nodes = store.fetch_nodes(100).unwrap();
        let rank_of = |name: &str| {
            nodes
                .iter()
                .find(|n| n.id == name)
                .and_then(|n| n.facts.as_ref())
                .map(|f| f.rank)
                .unwrap()
        };
        assert_eq!(rank_of("公司甲"), 3);
        assert_eq!(rank_of("公司乙"), 1);
        assert_eq!(rank_of("公司丙"), 2);
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let rows = [
            row("先来", "上游", "传感器:雷达", "50"),
            row("后到", "上游", "传感器:雷达", "50"),
        ];
        let (store, _) = import(&rows);
        let nodes = store.fetch_nodes(100).unwrap();
        let facts = |name: &str| {
            nodes
                .iter()
                .find(|n| n.id == name)
                .and_then(|n| n.facts.clone())
                .unwrap()
        };
        assert_eq!(facts("先来").rank, 1);
        assert_eq!(facts("后到").rank, 2);
    }

    #[test]
    fn test_idempotent_reimport() {
        let rows = [
            row("公司甲", "上游", "传感器:雷达", "25"),
            row("公司乙", "下游", "居家养老:上门护理", "75"),
        ];
        let (store, _) = import(&rows);
        let first_nodes = store.fetch_nodes(1000).unwrap();
        let first_edges = store.fetch_edges().unwrap();

        ImportService::new(&store).import_rows(&rows).unwrap();
        assert_eq!(store.fetch_nodes(1000).unwrap(), first_nodes);
        assert_eq!(store.fetch_edges().unwrap(), first_edges);
    }

    #[test]
    fn test_skips_rows_without_identity() {
        let mut unnamed = RawRow::new();
        unnamed.set(fields::ELIGIBLE, "1");
        unnamed.set(fields::STREAM, "上游");
        let unknown_stream = row("公司甲", "侧游", "x", "1");

        let (store, stats) = import(&[unnamed, unknown_stream]);
        assert_eq!(stats.imported, 0);
        assert_eq!(stats.skipped, 2);
        // only the seeded stream nodes remain
        assert_eq!(store.fetch_nodes(100).unwrap().len(), 3);
    }

    #[test]
    fn test_town_link_created_only_for_known_towns() {
        let mut with_town = row("上地公司", "上游", "传感器:雷达", "1");
        with_town.set(fields::BUSINESS_ADDRESS, "海淀区上地街道1号");
        let without_town = row("无址公司", "上游", "传感器:雷达", "1");

        let (store, _) = import(&[with_town, without_town]);
        let edges = store.fetch_edges().unwrap();
        assert!(edges.contains(&GraphEdge::new("上地公司", "上地街道", EdgeKind::LocatedIn)));
        assert!(!edges.iter().any(|e| e.source == "无址公司" && e.kind == EdgeKind::LocatedIn));

        let nodes = store.fetch_nodes(100).unwrap();
        let town = nodes.iter().find(|n| n.id == "上地街道").unwrap();
        assert_eq!(town.level, NodeLevel::Town);
        assert_eq!(town.category.as_deref(), Some(CATEGORY_TOWN));
    }

    #[test]
    fn test_enrichment_failure_degrades_to_empty() {
        struct FailingSummarizer;
        impl Summarizer for FailingSummarizer {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn summarize(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String> {
                Err(Error::OperationFailed {
                    operation: "summarize".to_string(),
                    cause: "quota exceeded".to_string(),
                })
            }
        }

        let mut r = row("示例公司", "上游", "传感器:雷达", "1");
        r.set(fields::INTRO, "一家做毫米波雷达的公司");

        let store = InMemoryGraphStore::new();
        let summarizer = FailingSummarizer;
        let stats = ImportService::new(&store)
            .with_summarizer(&summarizer)
            .import_rows(&[r])
            .unwrap();

        assert_eq!(stats.imported, 1);
        assert_eq!(stats.enrichment_failures, 1);
        let nodes = store.fetch_nodes(100).unwrap();
        let facts = nodes
            .iter()
            .find(|n| n.id == "示例公司")
            .and_then(|n| n.facts.clone())
            .unwrap();
        assert_eq!(facts.product_services, "");
    }

    #[test]
    fn test_summarizer_skipped_without_material() {
        struct PanickySummarizer;
        impl Summarizer for PanickySummarizer {
            fn name(&self) -> &'static str {
                "panicky"
            }
            fn summarize(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String> {
                Err(Error::InvalidInput("should not be called".to_string()))
            }
        }

        let store = InMemoryGraphStore::new();
        let summarizer = PanickySummarizer;
        let stats = ImportService::new(&store)
            .with_summarizer(&summarizer)
            .import_rows(&[row("示例公司", "上游", "传感器:雷达", "1")])
            .unwrap();
        assert_eq!(stats.enrichment_failures, 0);
    }

    #[test]
    fn test_noop_summarizer_produces_empty_summary() {
        let store = InMemoryGraphStore::new();
        let summarizer = NoopSummarizer::new();
        let mut r = row("示例公司", "上游", "传感器:雷达", "1");
        r.set(fields::INTRO, "简介");
        ImportService::new(&store)
            .with_summarizer(&summarizer)
            .import_rows(&[r])
            .unwrap();
        let nodes = store.fetch_nodes(100).unwrap();
        let facts = nodes
            .iter()
            .find(|n| n.id == "示例公司")
            .and_then(|n| n.facts.clone())
            .unwrap();
        assert_eq!(facts.product_services, "");
    }
}
