//! Fundtrace Dataset Sinks
//!
//! Writes generated datasets to the three supported output formats and
//! reads them back for validation and re-theming.
//!
//! # Formats
//!
//! - SQLite: `nodes` and `edges` tables plus a `network_summary` view
//! - CSV: one file per relation
//! - JSON: a single `{nodes, edges, summary, metadata}` document
//!
//! # Example
//!
//! ```rust,no_run
//! use fundtrace_db::{DatasetSink, SqliteStore};
//!
//! # async fn run(dataset: fundtrace_common::Dataset) -> fundtrace_db::Result<()> {
//! let store = SqliteStore::new("./output/networks.db");
//! store.write(&dataset).await?;
//!
//! for row in store.summary().await? {
//!     println!("{}: {} publications", row.disease, row.total_publications);
//! }
//! # Ok(())
//! # }
//! ```

pub mod csv_sink;
pub mod error;
pub mod json_sink;
pub mod rows;
pub mod schema;
pub mod sink;
pub mod sqlite;

pub use csv_sink::CsvSink;
pub use error::{DbError, Result};
pub use json_sink::JsonSink;
pub use schema::{TABLE_EDGES, TABLE_METADATA, TABLE_NODES, VIEW_SUMMARY};
pub use sink::{build_sinks, sqlite_path, DatasetSink, OutputFormat, SinkReport};
pub use sqlite::SqliteStore;
