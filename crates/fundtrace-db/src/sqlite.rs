//! SQLite relational store.
//!
//! Every operation opens its own connection on a blocking thread; the store
//! itself only holds the file path and is cheap to clone.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fundtrace_common::{Dataset, DatasetMetadata, SummaryRow};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use tracing::{debug, info};

use crate::error::Result;
use crate::rows;
use crate::schema::{self, EDGE_COLUMNS, NODE_COLUMNS, TABLE_EDGES, TABLE_METADATA, TABLE_NODES, VIEW_SUMMARY};
use crate::sink::{DatasetSink, SinkReport};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the tables and the summary view if they do not exist yet.
    pub async fn initialize(&self) -> Result<()> {
        let path = self.path.clone();
        task::spawn_blocking(move || -> Result<()> {
            let conn = open(&path)?;
            create_schema(&conn)
        })
        .await?
    }

    /// Replace the stored dataset in a single transaction.
    pub async fn write_dataset(&self, dataset: &Dataset) -> Result<()> {
        let path = self.path.clone();
        let dataset = dataset.clone();
        task::spawn_blocking(move || -> Result<()> {
            let mut conn = open(&path)?;
            create_schema(&conn)?;

            let tx = conn.transaction()?;
            tx.execute(&format!("DELETE FROM {TABLE_EDGES}"), [])?;
            tx.execute(&format!("DELETE FROM {TABLE_NODES}"), [])?;
            {
                let placeholders = vec!["?"; NODE_COLUMNS.split(',').count()].join(", ");
                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO {TABLE_NODES} ({NODE_COLUMNS}) VALUES ({placeholders})"
                ))?;
                for node in &dataset.nodes {
                    rows::insert_node(&mut stmt, node)?;
                }

                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO {TABLE_EDGES} ({EDGE_COLUMNS}) VALUES (?, ?, ?, ?)"
                ))?;
                for edge in &dataset.edges {
                    rows::insert_edge(&mut stmt, edge)?;
                }
            }
            tx.execute(
                &format!("INSERT OR REPLACE INTO {TABLE_METADATA} (id, body) VALUES (1, ?1)"),
                params![serde_json::to_string(&dataset.metadata)?],
            )?;
            tx.commit()?;

            debug!(nodes = dataset.nodes.len(), edges = dataset.edges.len(), "SQLite transaction committed");
            Ok(())
        })
        .await?
    }

    /// Read the stored dataset back. The summary comes from the view.
    pub async fn load(&self) -> Result<Dataset> {
        let path = self.path.clone();
        task::spawn_blocking(move || -> Result<Dataset> {
            let conn = open(&path)?;

            let mut nodes = Vec::new();
            let mut stmt = conn.prepare(&format!("SELECT {NODE_COLUMNS} FROM {TABLE_NODES} ORDER BY rowid"))?;
            let mut cursor = stmt.query([])?;
            while let Some(row) = cursor.next()? {
                nodes.push(rows::node_from_row(row)?);
            }

            let mut edges = Vec::new();
            let mut stmt = conn.prepare(&format!("SELECT {EDGE_COLUMNS} FROM {TABLE_EDGES} ORDER BY rowid"))?;
            let mut cursor = stmt.query([])?;
            while let Some(row) = cursor.next()? {
                edges.push(rows::edge_from_row(row)?);
            }

            let summary = read_summary(&conn)?;

            let metadata: Option<String> = conn
                .query_row(&format!("SELECT body FROM {TABLE_METADATA} WHERE id = 1"), [], |row| row.get(0))
                .optional()?;

            let mut dataset = match metadata {
                Some(body) => {
                    let metadata: DatasetMetadata = serde_json::from_str(&body)?;
                    Dataset { nodes, edges, summary, metadata }
                }
                None => Dataset::new(nodes, edges, summary, None),
            };
            dataset.refresh_metadata();
            Ok(dataset)
        })
        .await?
    }

    /// Per-network rollup straight from the summary view.
    pub async fn summary(&self) -> Result<Vec<SummaryRow>> {
        let path = self.path.clone();
        task::spawn_blocking(move || -> Result<Vec<SummaryRow>> {
            let conn = open(&path)?;
            read_summary(&conn)
        })
        .await?
    }
}

#[async_trait]
impl DatasetSink for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn write(&self, dataset: &Dataset) -> Result<SinkReport> {
        self.write_dataset(dataset).await?;
        info!(path = %self.path.display(), "Wrote SQLite store");
        Ok(SinkReport::new(self.name(), vec![self.path.clone()], dataset))
    }
}

fn open(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}

fn create_schema(conn: &Connection) -> Result<()> {
    for statement in schema::statements() {
        conn.execute_batch(statement)?;
    }
    Ok(())
}

fn read_summary(conn: &Connection) -> Result<Vec<SummaryRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT network_id, disease, treatment_name, grant_id, grant_year, approval_year, \
         funding_amount, total_publications, research_duration, treatment_connections, \
         realized_chains FROM {VIEW_SUMMARY} ORDER BY network_id"
    ))?;
    let mut summary = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        summary.push(rows::summary_from_row(row)?);
    }
    Ok(summary)
}
