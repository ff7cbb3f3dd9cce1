//! Sink round trips against generated catalogs.

use fundtrace_common::{Dataset, EdgeType};
use fundtrace_db::{build_sinks, sqlite_path, CsvSink, DatasetSink, JsonSink, OutputFormat, SqliteStore};
use fundtrace_kg::{check_dataset, Synthesizer};
use fundtrace_test_utils::{assert_eq, cancer_spec, seeded_config, temp_dir, three_network_catalog};

fn dataset(seed: u64) -> Dataset {
    Synthesizer::new(seeded_config(seed))
        .unwrap()
        .generate_catalog(&three_network_catalog())
        .unwrap()
        .to_dataset()
        .unwrap()
}

#[tokio::test]
async fn test_sqlite_round_trip() {
    let dir = temp_dir();
    let store = SqliteStore::new(dir.path().join("networks.db"));
    let original = dataset(42);

    let report = store.write(&original).await.unwrap();
    assert_eq!(report.sink, "sqlite");
    assert_eq!(report.nodes, original.nodes.len());

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.nodes, original.nodes);
    assert_eq!(loaded.edges, original.edges);
    assert_eq!(loaded.metadata.run_id, original.metadata.run_id);
    assert!(check_dataset(&loaded, 1).is_empty());
}

#[tokio::test]
async fn test_summary_view_matches_generator() {
    let dir = temp_dir();
    let store = SqliteStore::new(dir.path().join("networks.db"));
    let original = dataset(9);
    store.write(&original).await.unwrap();

    assert_eq!(store.summary().await.unwrap(), original.summary);
}

#[tokio::test]
async fn test_rewrite_replaces_previous_run() {
    let dir = temp_dir();
    let store = SqliteStore::new(dir.path().join("networks.db"));
    store.write(&dataset(1)).await.unwrap();

    let single = Synthesizer::new(seeded_config(2))
        .unwrap()
        .generate_catalog(&[cancer_spec()])
        .unwrap()
        .to_dataset()
        .unwrap();
    store.write(&single).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.network_ids(), vec![1]);
    assert_eq!(loaded.nodes, single.nodes);
    assert_eq!(loaded.summary.len(), 1);
}

#[tokio::test]
async fn test_duplicate_edges_survive_storage() {
    let dir = temp_dir();
    let store = SqliteStore::new(dir.path().join("networks.db"));
    let mut tampered = dataset(5);
    let cites = tampered
        .edges
        .iter()
        .find(|e| e.edge_type == EdgeType::Cites)
        .cloned()
        .unwrap();
    tampered.edges.push(cites);
    store.write(&tampered).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.edges.len(), tampered.edges.len());
    assert!(!check_dataset(&loaded, 1).is_empty());
}

#[tokio::test]
async fn test_csv_tables_have_headers() {
    let dir = temp_dir();
    let sink = CsvSink::new(dir.path(), "run_");
    let original = dataset(3);
    let report = sink.write(&original).await.unwrap();
    assert_eq!(report.locations.len(), 3);

    let [nodes, edges, summary] = sink.paths();
    let nodes = std::fs::read_to_string(nodes).unwrap();
    assert!(nodes.starts_with("node_id,node_type,network_id,year,"));
    assert_eq!(nodes.lines().count(), original.nodes.len() + 1);

    let edges = std::fs::read_to_string(edges).unwrap();
    assert!(edges.starts_with("source_id,target_id,edge_type,network_id"));
    assert_eq!(edges.lines().count(), original.edges.len() + 1);

    let summary = std::fs::read_to_string(summary).unwrap();
    assert_eq!(summary.lines().count(), 4);
}

#[tokio::test]
async fn test_json_round_trip() {
    let dir = temp_dir();
    let sink = JsonSink::new(dir.path().join("out").join("dataset.json"));
    let original = dataset(11);
    sink.write(&original).await.unwrap();
    assert_eq!(sink.load().await.unwrap(), original);
}

#[tokio::test]
async fn test_all_formats_write_to_one_directory() {
    let dir = temp_dir();
    let original = dataset(4);
    let sinks = build_sinks(&[OutputFormat::Sqlite, OutputFormat::Csv, OutputFormat::Json], dir.path(), "");
    for sink in &sinks {
        sink.write(&original).await.unwrap();
    }

    assert!(sqlite_path(dir.path(), "").exists());
    assert!(dir.path().join("nodes.csv").exists());
    assert!(dir.path().join("dataset.json").exists());
}
