//! Relational row types: the generator's output contract with sinks and dashboards.
//!
//! Every `NodeRow` carries every column; columns that do not apply to a node
//! type are `None` so consumers can rely on one stable schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{EdgeType, NodeType, PublicationKind, ResearchPhase};

/// Dataset format version written into metadata.
pub const DATASET_VERSION: &str = "3.1";

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub node_id: String,
    pub node_type: NodeType,
    pub network_id: u32,
    pub year: i32,
    pub publication_kind: Option<PublicationKind>,
    pub grant_id: Option<String>,
    pub funding_amount: Option<u64>,
    pub pi_name: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub pmid: Option<u32>,
    pub disease: Option<String>,
    pub treatment_name: Option<String>,
    pub approval_year: Option<i32>,
    pub research_phase: Option<ResearchPhase>,
    pub funded_by_grant: Option<bool>,
    pub treatment_related: Option<bool>,
    pub citation_count: Option<u32>,
    pub fda_approved: Option<bool>,
}

impl NodeRow {
    /// A row with only the shared columns filled in.
    pub fn new(node_id: impl Into<String>, node_type: NodeType, network_id: u32, year: i32) -> Self {
        Self {
            node_id: node_id.into(),
            node_type,
            network_id,
            year,
            publication_kind: None,
            grant_id: None,
            funding_amount: None,
            pi_name: None,
            title: None,
            authors: None,
            journal: None,
            pmid: None,
            disease: None,
            treatment_name: None,
            approval_year: None,
            research_phase: None,
            funded_by_grant: None,
            treatment_related: None,
            citation_count: None,
            fda_approved: None,
        }
    }

    /// Names of the columns that are mandatory for this row's node type but null.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let mut require = |present: bool, name: &'static str| {
            if !present {
                missing.push(name);
            }
        };

        match self.node_type {
            NodeType::Grant => {
                require(self.grant_id.is_some(), "grant_id");
                require(self.funding_amount.is_some(), "funding_amount");
                require(self.pi_name.is_some(), "pi_name");
                require(self.title.is_some(), "title");
                require(self.disease.is_some(), "disease");
                require(self.treatment_name.is_some(), "treatment_name");
                require(self.approval_year.is_some(), "approval_year");
            }
            NodeType::Publication => {
                require(self.publication_kind.is_some(), "publication_kind");
                require(self.title.is_some(), "title");
                require(self.authors.is_some(), "authors");
                require(self.journal.is_some(), "journal");
                require(self.pmid.is_some(), "pmid");
                require(self.research_phase.is_some(), "research_phase");
                require(self.funded_by_grant.is_some(), "funded_by_grant");
                require(self.treatment_related.is_some(), "treatment_related");
                require(self.citation_count.is_some(), "citation_count");
            }
            NodeType::Treatment => {
                require(self.treatment_name.is_some(), "treatment_name");
                require(self.approval_year.is_some(), "approval_year");
                require(self.disease.is_some(), "disease");
            }
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source_id: String,
    pub target_id: String,
    pub edge_type: EdgeType,
    pub network_id: u32,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// One row per network, always derived from the node and edge rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub network_id: u32,
    pub disease: String,
    pub treatment_name: String,
    pub grant_id: String,
    pub grant_year: i32,
    pub approval_year: i32,
    pub funding_amount: u64,
    pub total_publications: u32,
    pub research_duration: i32,
    pub treatment_connections: u32,
    pub realized_chains: u32,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub seed: Option<u64>,
    pub total_networks: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_funding: u64,
    pub edge_type_counts: BTreeMap<String, usize>,
}

/// All three relations of a generation run plus run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<NodeRow>,
    pub edges: Vec<EdgeRow>,
    pub summary: Vec<SummaryRow>,
    pub metadata: DatasetMetadata,
}

impl Dataset {
    /// Assemble a dataset, deriving the metadata totals from the rows.
    pub fn new(
        nodes: Vec<NodeRow>,
        edges: Vec<EdgeRow>,
        summary: Vec<SummaryRow>,
        seed: Option<u64>,
    ) -> Self {
        let metadata = DatasetMetadata {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            version: DATASET_VERSION.to_string(),
            seed,
            total_networks: summary.len(),
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            total_funding: total_funding(&nodes),
            edge_type_counts: edge_type_counts(&edges),
        };
        Self { nodes, edges, summary, metadata }
    }

    /// Distinct network ids in node order.
    pub fn network_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.nodes.iter().map(|n| n.network_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn network_nodes(&self, network_id: u32) -> impl Iterator<Item = &NodeRow> {
        self.nodes.iter().filter(move |n| n.network_id == network_id)
    }

    pub fn network_edges(&self, network_id: u32) -> impl Iterator<Item = &EdgeRow> {
        self.edges.iter().filter(move |e| e.network_id == network_id)
    }

    /// Recompute metadata totals after rows were replaced.
    pub fn refresh_metadata(&mut self) {
        self.metadata.total_networks = self.summary.len();
        self.metadata.total_nodes = self.nodes.len();
        self.metadata.total_edges = self.edges.len();
        self.metadata.total_funding = total_funding(&self.nodes);
        self.metadata.edge_type_counts = edge_type_counts(&self.edges);
    }
}

fn total_funding(nodes: &[NodeRow]) -> u64 {
    nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Grant)
        .filter_map(|n| n.funding_amount)
        .sum()
}

fn edge_type_counts(edges: &[EdgeRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for edge in edges {
        *counts.entry(edge.edge_type.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_publication_row_reports_missing_fields() {
        let row = NodeRow::new("ECO_1_1", NodeType::Publication, 1, 2019);
        let missing = row.missing_fields();
        assert!(missing.contains(&"title"));
        assert!(missing.contains(&"publication_kind"));
        assert!(!missing.contains(&"grant_id"), "grant columns are not mandatory for publications");
    }

    #[test]
    fn test_treatment_row_complete() {
        let mut row = NodeRow::new("TREAT_1", NodeType::Treatment, 1, 2024);
        row.treatment_name = Some("CAR-T".to_string());
        row.approval_year = Some(2024);
        row.disease = Some("Cancer".to_string());
        assert!(row.missing_fields().is_empty());
    }

    #[test]
    fn test_metadata_totals() {
        let mut grant = NodeRow::new("GRANT_1", NodeType::Grant, 1, 2016);
        grant.funding_amount = Some(2_000_000);
        let edges = vec![
            EdgeRow {
                source_id: "GRANT_1".into(),
                target_id: "PUB_1_1".into(),
                edge_type: EdgeType::FundedBy,
                network_id: 1,
            },
            EdgeRow {
                source_id: "ECO_1_2".into(),
                target_id: "PUB_1_1".into(),
                edge_type: EdgeType::Cites,
                network_id: 1,
            },
        ];
        let dataset = Dataset::new(vec![grant], edges, vec![], Some(7));
        assert_eq!(dataset.metadata.total_funding, 2_000_000);
        assert_eq!(dataset.metadata.edge_type_counts["cites"], 1);
        assert_eq!(dataset.metadata.seed, Some(7));
        assert_eq!(dataset.network_ids(), vec![1]);
    }
}
