//! End-to-end pipeline tests: CSV input → import → export document.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use chainatlas::{ExportService, GraphStore, ImportService, SqliteGraphStore};
use std::io::Cursor;

const HEADER: &str = "是否属于智慧养老,企业名称,上中下游,细分小类,注册资本(万),置信度,经营地,单位资质,公司简介\n";

fn csv(rows: &[&str]) -> Cursor<String> {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    Cursor::new(text)
}

fn temp_store() -> (tempfile::TempDir, SqliteGraphStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteGraphStore::new(dir.path().join("graph.db")).unwrap();
    (dir, store)
}

#[test]
fn test_full_pipeline() {
    let (_dir, store) = temp_store();
    let input = csv(&[
        "1,示例公司,下游,居家养老：上门护理,500万,80,海淀区上地街道1号,高新技术企业,一家上门护理服务商",
    ]);

    let stats = ImportService::new(&store).run(input).unwrap();
    assert_eq!(stats.rows_read, 1);
    assert_eq!(stats.imported, 1);
    assert_eq!(stats.groups, 1);

    let doc = ExportService::new(&store).build_document().unwrap();

    // 3 streams + plate + sub-category + enterprise + town
    assert_eq!(doc.nodes.len(), 7);
    let node = |id: &str| doc.nodes.iter().find(|n| n.id == id).unwrap();

    assert_eq!(node("下游").level, 1);
    assert_eq!(node("下游-居家养老").parent.as_deref(), Some("下游"));
    assert_eq!(
        node("下游-居家养老-上门护理").parent.as_deref(),
        Some("下游-居家养老")
    );

    let enterprise = node("示例公司");
    assert_eq!(enterprise.level, 4);
    assert_eq!(enterprise.category.as_deref(), Some("企业"));
    assert_eq!(enterprise.details.code, "CODE1");
    assert_eq!(enterprise.details.rank, 1);
    assert_eq!(enterprise.details.total_siblings, 1);
    // 10 × ln(501) truncated
    assert_eq!(enterprise.details.star_str, 3.1);
    assert_eq!(enterprise.details.confidence, 80.0);
    assert_eq!(enterprise.details.intro, "一家上门护理服务商");
    // no summarizer configured
    assert_eq!(enterprise.details.product_services, "-");

    let town = node("上地街道");
    assert_eq!(town.level, 5);
    assert_eq!(town.category.as_deref(), Some("街镇"));

    let has_link = |source: &str, target: &str| {
        doc.links
            .iter()
            .any(|l| l.source == source && l.target == target)
    };
    assert!(has_link("上游", "中游"));
    assert!(has_link("中游", "下游"));
    assert!(has_link("下游", "下游-居家养老"));
    assert!(has_link("下游-居家养老", "下游-居家养老-上门护理"));
    assert!(has_link("下游-居家养老-上门护理", "示例公司"));
    assert!(has_link("示例公司", "上地街道"));
}

#[test]
fn test_ranking_within_group() {
    let (_dir, store) = temp_store();
    let input = csv(&[
        "1,公司甲,上游,传感器:毫米波雷达,,25,,,",
        "1,公司乙,上游,传感器:毫米波雷达,,75,,,",
        "1,公司丙,上游,传感器:毫米波雷达,,50,,,",
    ]);
    ImportService::new(&store).run(input).unwrap();

    let doc = ExportService::new(&store).build_document().unwrap();
    let details = |id: &str| &doc.nodes.iter().find(|n| n.id == id).unwrap().details;

    assert_eq!(details("公司乙").rank, 1);
    assert_eq!(details("公司乙").code, "CODE1");
    assert_eq!(details("公司丙").rank, 2);
    assert_eq!(details("公司甲").rank, 3);
    assert_eq!(details("公司甲").total_siblings, 3);
}

#[test]
fn test_reimport_is_idempotent() {
    let (_dir, store) = temp_store();
    let rows = [
        "1,公司甲,上游,传感器:毫米波雷达,100万,25,,,",
        "1,公司乙,下游,居家养老:上门护理,200万,75,,,",
    ];

    ImportService::new(&store).run(csv(&rows)).unwrap();
    let first = ExportService::new(&store).build_document().unwrap();

    ImportService::new(&store).run(csv(&rows)).unwrap();
    let second = ExportService::new(&store).build_document().unwrap();

    assert_eq!(first, second);

    let stats = store.stats().unwrap();
    assert_eq!(stats.node_count, first.nodes.len());
    assert_eq!(stats.edge_count, first.links.len());
}

#[test]
fn test_ineligible_and_malformed_rows_are_skipped() {
    let (_dir, store) = temp_store();
    let input = csv(&[
        "0,落选公司,上游,传感器:雷达,,10,,,",
        "1,,上游,传感器:雷达,,10,,,",
        "1,无派公司,无效派别,传感器:雷达,,10,,,",
        "1,合格公司,上游,传感器:雷达,,10,,,",
    ]);

    let stats = ImportService::new(&store).run(input).unwrap();
    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.imported, 1);
    assert_eq!(stats.skipped, 3);

    let doc = ExportService::new(&store).build_document().unwrap();
    assert!(doc.nodes.iter().any(|n| n.id == "合格公司"));
    assert!(!doc.nodes.iter().any(|n| n.id == "落选公司"));
    assert!(!doc.nodes.iter().any(|n| n.id == "无派公司"));
}

#[test]
fn test_null_tokens_become_display_defaults() {
    let (_dir, store) = temp_store();
    let input = csv(&["1,空值公司,上游,传感器:雷达,nan,无,null,-,None"]);
    ImportService::new(&store).run(input).unwrap();

    let doc = ExportService::new(&store).build_document().unwrap();
    let details = &doc.nodes.iter().find(|n| n.id == "空值公司").unwrap().details;

    assert_eq!(details.capital, "-");
    assert_eq!(details.intro, "暂无");
    assert_eq!(details.confidence, 0.0);
    assert_eq!(details.tags, "-");
    // no address survives, so no town node either
    assert!(!doc.nodes.iter().any(|n| n.level == 5));
}

#[test]
fn test_export_row_limit_truncates_consistently() {
    let (_dir, store) = temp_store();
    let input = csv(&[
        "1,公司甲,上游,传感器:雷达,,10,,,",
        "1,公司乙,上游,传感器:雷达,,20,,,",
    ]);
    ImportService::new(&store).run(input).unwrap();

    let doc = ExportService::new(&store)
        .with_row_limit(3)
        .build_document()
        .unwrap();
    assert_eq!(doc.nodes.len(), 3);
    for link in &doc.links {
        assert!(doc.nodes.iter().any(|n| n.id == link.source));
        assert!(doc.nodes.iter().any(|n| n.id == link.target));
    }
}

#[test]
fn test_document_json_shape() {
    let (_dir, store) = temp_store();
    ImportService::new(&store)
        .run(csv(&["1,示例公司,中游,智慧服务：远程监护,,50,,,"]))
        .unwrap();

    let doc = ExportService::new(&store).build_document().unwrap();
    let json = serde_json::to_value(&doc).unwrap();

    assert!(json["nodes"].is_array());
    assert!(json["links"].is_array());
    let enterprise = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "示例公司")
        .unwrap();
    assert_eq!(enterprise["details"]["code"], "CODE1");
    assert_eq!(enterprise["details"]["total_siblings"], 1);
    assert_eq!(enterprise["parent"], "中游-智慧服务-远程监护");
}
