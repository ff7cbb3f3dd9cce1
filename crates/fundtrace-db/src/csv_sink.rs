//! Delimited-text sink: one CSV file per relation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fundtrace_common::Dataset;
use serde::Serialize;
use tokio::task;
use tracing::info;

use crate::error::Result;
use crate::sink::{DatasetSink, SinkReport};

#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    prefix: String,
}

impl CsvSink {
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), prefix: prefix.to_string() }
    }

    /// `<prefix>nodes.csv`, `<prefix>edges.csv`, `<prefix>summary.csv`.
    pub fn paths(&self) -> [PathBuf; 3] {
        ["nodes", "edges", "summary"].map(|table| self.dir.join(format!("{}{table}.csv", self.prefix)))
    }
}

#[async_trait]
impl DatasetSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn write(&self, dataset: &Dataset) -> Result<SinkReport> {
        let [nodes_path, edges_path, summary_path] = self.paths();
        let dir = self.dir.clone();
        let owned = dataset.clone();
        let (n, e, s) = (nodes_path.clone(), edges_path.clone(), summary_path.clone());

        task::spawn_blocking(move || -> Result<()> {
            std::fs::create_dir_all(&dir)?;
            write_rows(&n, &owned.nodes)?;
            write_rows(&e, &owned.edges)?;
            write_rows(&s, &owned.summary)
        })
        .await??;

        info!(dir = %self.dir.display(), "Wrote CSV tables");
        Ok(SinkReport::new(self.name(), vec![nodes_path, edges_path, summary_path], dataset))
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
