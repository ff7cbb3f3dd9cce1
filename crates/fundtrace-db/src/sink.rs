//! Output sinks for generated datasets.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use fundtrace_common::Dataset;
use serde::{Deserialize, Serialize};

use crate::csv_sink::CsvSink;
use crate::error::{DbError, Result};
use crate::json_sink::JsonSink;
use crate::sqlite::SqliteStore;

/// What a sink wrote and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReport {
    pub sink: &'static str,
    pub locations: Vec<PathBuf>,
    pub nodes: usize,
    pub edges: usize,
}

impl SinkReport {
    pub fn new(sink: &'static str, locations: Vec<PathBuf>, dataset: &Dataset) -> Self {
        Self {
            sink,
            locations,
            nodes: dataset.nodes.len(),
            edges: dataset.edges.len(),
        }
    }
}

/// A destination for a complete dataset. Sinks never modify the dataset, so
/// a failed write can be retried with the same value.
#[async_trait]
pub trait DatasetSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn write(&self, dataset: &Dataset) -> Result<SinkReport>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Sqlite,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Sqlite => "sqlite",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Ok(OutputFormat::Sqlite),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(DbError::UnknownFormat(other.to_string())),
        }
    }
}

/// File name of the SQLite store inside an output directory.
pub fn sqlite_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{prefix}networks.db"))
}

/// One sink per distinct format, in the order given.
pub fn build_sinks(formats: &[OutputFormat], dir: &Path, prefix: &str) -> Vec<Box<dyn DatasetSink>> {
    let mut seen = Vec::new();
    let mut sinks: Vec<Box<dyn DatasetSink>> = Vec::new();
    for &format in formats {
        if seen.contains(&format) {
            continue;
        }
        seen.push(format);
        sinks.push(match format {
            OutputFormat::Sqlite => Box::new(SqliteStore::new(sqlite_path(dir, prefix))),
            OutputFormat::Csv => Box::new(CsvSink::new(dir, prefix)),
            OutputFormat::Json => Box::new(JsonSink::new(dir.join(format!("{prefix}dataset.json")))),
        });
    }
    sinks
}
