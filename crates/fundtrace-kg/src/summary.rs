//! Per-network and per-catalog rollups, recomputed from the relational rows.

use std::collections::BTreeMap;

use ahash::AHashSet;
use fundtrace_common::{
    EdgeRow, EdgeType, FundtraceError, NodeRow, NodeType, PublicationKind, Result, SummaryRow,
};
use serde::Serialize;
use tracing::info;

use crate::model::NetworkGraph;

/// Summary row of one generated network.
pub fn summarize_network(graph: &NetworkGraph) -> Result<SummaryRow> {
    let nodes = graph.node_rows();
    let edges = graph.edge_rows();
    summarize_rows(nodes.iter(), edges.iter())
}

/// Summary row from the node and edge rows of a single network.
pub fn summarize_rows<'a>(
    nodes: impl IntoIterator<Item = &'a NodeRow>,
    edges: impl IntoIterator<Item = &'a EdgeRow>,
) -> Result<SummaryRow> {
    let nodes: Vec<&NodeRow> = nodes.into_iter().collect();

    let grant = single(&nodes, NodeType::Grant)?;
    let treatment = single(&nodes, NodeType::Treatment)?;
    let network_id = grant.network_id;

    let field = |value: Option<&String>, name: &str| {
        value.cloned().ok_or_else(|| {
            FundtraceError::MalformedGraph(format!("grant of network {network_id} has no {name}"))
        })
    };
    let approval_year = treatment.approval_year.unwrap_or(treatment.year);

    let publications: Vec<&NodeRow> = nodes
        .iter()
        .copied()
        .filter(|n| n.node_type == NodeType::Publication)
        .collect();
    let edges: Vec<&EdgeRow> = edges.into_iter().collect();
    let treatment_connections = edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::LeadsToTreatment)
        .count();
    let realized = realized_chains(&publications, &edges);

    Ok(SummaryRow {
        network_id,
        disease: field(grant.disease.as_ref(), "disease")?,
        treatment_name: field(grant.treatment_name.as_ref(), "treatment_name")?,
        grant_id: field(grant.grant_id.as_ref(), "grant_id")?,
        grant_year: grant.year,
        approval_year,
        funding_amount: grant.funding_amount.unwrap_or_default(),
        total_publications: publications.len() as u32,
        research_duration: approval_year - grant.year,
        treatment_connections: treatment_connections as u32,
        realized_chains: realized as u32,
    })
}

/// Distinct pathway papers with a `leads_to_treatment` edge into a paper
/// that `cites` a funded paper.
pub fn realized_chains(nodes: &[&NodeRow], edges: &[&EdgeRow]) -> usize {
    let funded = ids_of(nodes, PublicationKind::Funded);
    let pathway = ids_of(nodes, PublicationKind::Pathway);
    let cites_funded: AHashSet<&str> = edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::Cites && funded.contains(e.target_id.as_str()))
        .map(|e| e.source_id.as_str())
        .collect();
    edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::LeadsToTreatment)
        .filter(|e| pathway.contains(e.source_id.as_str()) && cites_funded.contains(e.target_id.as_str()))
        .map(|e| e.source_id.as_str())
        .collect::<AHashSet<&str>>()
        .len()
}

fn ids_of<'a>(nodes: &[&'a NodeRow], kind: PublicationKind) -> AHashSet<&'a str> {
    nodes
        .iter()
        .filter(|n| n.publication_kind == Some(kind))
        .map(|n| n.node_id.as_str())
        .collect()
}

fn single<'a>(nodes: &[&'a NodeRow], node_type: NodeType) -> Result<&'a NodeRow> {
    let mut matching = nodes.iter().copied().filter(|n| n.node_type == node_type);
    match (matching.next(), matching.next()) {
        (Some(node), None) => Ok(node),
        (None, _) => Err(FundtraceError::MalformedGraph(format!("network has no {node_type} node"))),
        (Some(node), Some(_)) => Err(FundtraceError::MalformedGraph(format!(
            "network {} has more than one {node_type} node",
            node.network_id
        ))),
    }
}

/// Summary rows for every network of a dataset, in network id order.
pub fn summarize_dataset(nodes: &[NodeRow], edges: &[EdgeRow]) -> Result<Vec<SummaryRow>> {
    let mut ids: Vec<u32> = nodes.iter().map(|n| n.network_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter()
        .map(|id| {
            summarize_rows(
                nodes.iter().filter(|n| n.network_id == id),
                edges.iter().filter(|e| e.network_id == id),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Catalog rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_networks: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_funding: u64,
    pub edge_type_counts: BTreeMap<EdgeType, usize>,
    /// Networks with at least one recorded degradation.
    pub degraded_networks: usize,
}

impl CatalogStats {
    pub fn from_networks(networks: &[NetworkGraph]) -> Self {
        let mut stats = Self::default();
        for graph in networks {
            stats.total_networks += 1;
            stats.total_nodes += graph.nodes().len();
            stats.total_edges += graph.edges().len();
            stats.total_funding += graph.funding_amount();
            for edge in graph.edges() {
                *stats.edge_type_counts.entry(edge.kind).or_insert(0) += 1;
            }
            if !graph.degradations().is_empty() {
                stats.degraded_networks += 1;
            }
        }
        stats
    }

    pub fn log(&self) {
        info!(
            networks = self.total_networks,
            nodes = self.total_nodes,
            edges = self.total_edges,
            funding = self.total_funding,
            degraded = self.degraded_networks,
            "Catalog totals"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: &str, target: &str, edge_type: EdgeType) -> EdgeRow {
        EdgeRow { source_id: source.into(), target_id: target.into(), edge_type, network_id: 1 }
    }

    fn publication(id: &str, kind: PublicationKind, year: i32) -> NodeRow {
        let mut row = NodeRow::new(id, NodeType::Publication, 1, year);
        row.publication_kind = Some(kind);
        row
    }

    fn rows() -> Vec<NodeRow> {
        let mut grant = NodeRow::new("GRANT_1", NodeType::Grant, 1, 2016);
        grant.grant_id = Some("INST-R01-123456".into());
        grant.funding_amount = Some(2_000_000);
        grant.disease = Some("Cancer".into());
        grant.treatment_name = Some("CAR-T".into());
        let mut treatment = NodeRow::new("TREAT_1", NodeType::Treatment, 1, 2024);
        treatment.approval_year = Some(2024);
        vec![
            grant,
            publication("PUB_1_1", PublicationKind::Funded, 2017),
            publication("ECO_1_1", PublicationKind::Ecosystem, 2018),
            publication("ECO_1_2", PublicationKind::Ecosystem, 2019),
            publication("TREAT_PUB_1_1", PublicationKind::Pathway, 2022),
            publication("TREAT_PUB_1_2", PublicationKind::Pathway, 2023),
            treatment,
        ]
    }

    #[test]
    fn test_summary_counts() {
        let nodes = rows();
        let edges = vec![
            edge("GRANT_1", "PUB_1_1", EdgeType::FundedBy),
            edge("ECO_1_1", "PUB_1_1", EdgeType::Cites),
            edge("TREAT_PUB_1_1", "ECO_1_1", EdgeType::LeadsToTreatment),
            edge("TREAT_PUB_1_1", "ECO_1_2", EdgeType::LeadsToTreatment),
            edge("TREAT_PUB_1_2", "ECO_1_2", EdgeType::LeadsToTreatment),
            edge("TREAT_PUB_1_1", "TREAT_1", EdgeType::EnablesTreatment),
        ];
        let row = summarize_rows(&nodes, &edges).unwrap();
        assert_eq!(row.grant_year, 2016);
        assert_eq!(row.research_duration, 8);
        assert_eq!(row.total_publications, 5);
        assert_eq!(row.treatment_connections, 3);
        assert_eq!(row.realized_chains, 1);
        assert_eq!(row.funding_amount, 2_000_000);
    }

    #[test]
    fn test_missing_treatment_is_malformed() {
        let nodes: Vec<NodeRow> = rows().into_iter().filter(|n| n.node_type != NodeType::Treatment).collect();
        let err = summarize_rows(&nodes, &Vec::<EdgeRow>::new()).unwrap_err();
        assert!(matches!(err, FundtraceError::MalformedGraph(_)));
    }

    #[test]
    fn test_summarize_dataset_per_network() {
        let mut nodes = rows();
        nodes.extend(rows().into_iter().map(|mut n| {
            n.network_id = 2;
            n.node_id = n.node_id.replace("_1", "_2");
            n
        }));
        let summary = summarize_dataset(&nodes, &[]).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].network_id, 2);
        assert_eq!(summary[1].realized_chains, 0);
    }
}
