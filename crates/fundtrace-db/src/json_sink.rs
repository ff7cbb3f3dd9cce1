//! JSON document sink: `{nodes, edges, summary, metadata}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fundtrace_common::Dataset;
use tracing::info;

use crate::error::Result;
use crate::sink::{DatasetSink, SinkReport};

#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub async fn load(&self) -> Result<Dataset> {
        let body = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DatasetSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn write(&self, dataset: &Dataset) -> Result<SinkReport> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(dataset)?;
        tokio::fs::write(&self.path, body).await?;

        info!(path = %self.path.display(), "Wrote JSON dataset");
        Ok(SinkReport::new(self.name(), vec![self.path.clone()], dataset))
    }
}
