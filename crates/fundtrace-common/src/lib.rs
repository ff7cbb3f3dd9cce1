//! fundtrace-common — Shared types, errors, and settings used across all fundtrace crates.

pub mod error;
pub mod entities;
pub mod tables;
pub mod network_config;

// Re-export commonly used types
pub use error::{FundtraceError, Result};
pub use entities::{EdgeType, NodeType, PublicationKind, ResearchPhase};
pub use tables::{Dataset, DatasetMetadata, EdgeRow, NodeRow, SummaryRow};
pub use network_config::{
    CitationRules, GrantParams, NetworkShape, NetworkTemplate, SynthesisConfig, TemplateSpec,
};
