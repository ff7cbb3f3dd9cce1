//! Structural checks over generated or stored networks.
//!
//! Checks run on the relational rows so that a dataset read back from a sink
//! is validated with exactly the same rules as a freshly generated one.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use fundtrace_common::{Dataset, EdgeRow, EdgeType, NodeRow, NodeType, PublicationKind};
use serde::Serialize;

use crate::model::NetworkGraph;
use crate::summary::realized_chains;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Violation {
    /// A network without exactly one node of this type.
    NodeCount { network_id: u32, node_type: NodeType, count: usize },
    DuplicateNodeId { node_id: String },
    /// A publication outside the open interval (grant year, approval year).
    TemporalOrder { node_id: String, year: i32, grant_year: i32, approval_year: i32 },
    ForwardCitation { source: String, target: String },
    DanglingEdge { source: String, target: String },
    DuplicateEdge { source: String, target: String },
    TreatmentNotEnabled { network_id: u32 },
    ChainShortfall { network_id: u32, required: usize, realized: usize },
    MissingFields { node_id: String, fields: Vec<String> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeCount { network_id, node_type, count } => {
                write!(f, "network {network_id} has {count} {node_type} nodes, expected 1")
            }
            Self::DuplicateNodeId { node_id } => write!(f, "node id {node_id} is not unique"),
            Self::TemporalOrder { node_id, year, grant_year, approval_year } => write!(
                f,
                "{node_id} ({year}) is outside the research window {grant_year}..{approval_year}"
            ),
            Self::ForwardCitation { source, target } => {
                write!(f, "{source} cites the newer paper {target}")
            }
            Self::DanglingEdge { source, target } => {
                write!(f, "edge {source} -> {target} references an unknown node")
            }
            Self::DuplicateEdge { source, target } => write!(f, "edge {source} -> {target} is repeated"),
            Self::TreatmentNotEnabled { network_id } => {
                write!(f, "treatment of network {network_id} has no enabling pathway paper")
            }
            Self::ChainShortfall { network_id, required, realized } => write!(
                f,
                "network {network_id} realizes {realized} of {required} guaranteed chains"
            ),
            Self::MissingFields { node_id, fields } => {
                write!(f, "{node_id} is missing {}", fields.join(", "))
            }
        }
    }
}

/// Validate a generated network against its own template.
///
/// The required chain count is the template's, clamped to the pathway count.
/// Chains the generator could not build surface as `ChainShortfall`.
pub fn check_network(graph: &NetworkGraph) -> Vec<Violation> {
    let pathway = graph.publications(PublicationKind::Pathway).count();
    let required = graph.template().guaranteed_chains().min(pathway);

    let nodes = graph.node_rows();
    let edges = graph.edge_rows();
    let node_refs: Vec<&NodeRow> = nodes.iter().collect();
    let edge_refs: Vec<&EdgeRow> = edges.iter().collect();

    let mut violations = check_unique_ids(&node_refs);
    violations.extend(check_rows(graph.network_id(), &node_refs, &edge_refs, required));
    violations
}

/// Validate every network of a dataset, requiring `min_chains` realized
/// chains per network (clamped to its pathway count).
pub fn check_dataset(dataset: &Dataset, min_chains: usize) -> Vec<Violation> {
    let all: Vec<&NodeRow> = dataset.nodes.iter().collect();
    let mut violations = check_unique_ids(&all);

    for network_id in dataset.network_ids() {
        let nodes: Vec<&NodeRow> = dataset.network_nodes(network_id).collect();
        let edges: Vec<&EdgeRow> = dataset.network_edges(network_id).collect();
        let pathway = nodes
            .iter()
            .filter(|n| n.publication_kind == Some(PublicationKind::Pathway))
            .count();
        violations.extend(check_rows(network_id, &nodes, &edges, min_chains.min(pathway)));
    }
    violations
}

fn check_unique_ids(nodes: &[&NodeRow]) -> Vec<Violation> {
    let mut seen = AHashSet::new();
    let mut reported = AHashSet::new();
    let mut violations = Vec::new();
    for node in nodes {
        let id = node.node_id.as_str();
        if !seen.insert(id) && reported.insert(id) {
            violations.push(Violation::DuplicateNodeId { node_id: id.to_string() });
        }
    }
    violations
}

fn check_rows(network_id: u32, nodes: &[&NodeRow], edges: &[&EdgeRow], required_chains: usize) -> Vec<Violation> {
    let mut violations = Vec::new();

    for node in nodes {
        let missing = node.missing_fields();
        if !missing.is_empty() {
            violations.push(Violation::MissingFields {
                node_id: node.node_id.clone(),
                fields: missing.into_iter().map(String::from).collect(),
            });
        }
    }

    let of_type = |t: NodeType| nodes.iter().filter(|n| n.node_type == t).collect::<Vec<_>>();
    let grants = of_type(NodeType::Grant);
    let treatments = of_type(NodeType::Treatment);
    for (t, found) in [(NodeType::Grant, grants.len()), (NodeType::Treatment, treatments.len())] {
        if found != 1 {
            violations.push(Violation::NodeCount { network_id, node_type: t, count: found });
        }
    }

    if let (Some(grant), Some(treatment)) = (grants.first(), treatments.first()) {
        let approval_year = treatment.approval_year.unwrap_or(treatment.year);
        for node in nodes.iter().filter(|n| n.node_type == NodeType::Publication) {
            if node.year <= grant.year || node.year >= approval_year {
                violations.push(Violation::TemporalOrder {
                    node_id: node.node_id.clone(),
                    year: node.year,
                    grant_year: grant.year,
                    approval_year,
                });
            }
        }
    }

    let by_id: AHashMap<&str, &NodeRow> = nodes.iter().map(|n| (n.node_id.as_str(), *n)).collect();
    let mut pairs = AHashSet::new();
    for edge in edges {
        let (source, target) = (edge.source_id.as_str(), edge.target_id.as_str());
        let (Some(s), Some(t)) = (by_id.get(source), by_id.get(target)) else {
            violations.push(Violation::DanglingEdge { source: source.into(), target: target.into() });
            continue;
        };
        if !pairs.insert((source, target)) {
            violations.push(Violation::DuplicateEdge { source: source.into(), target: target.into() });
        }
        if edge.edge_type == EdgeType::Cites && t.year > s.year {
            violations.push(Violation::ForwardCitation { source: source.into(), target: target.into() });
        }
    }

    let enabled = edges.iter().any(|e| {
        e.edge_type == EdgeType::EnablesTreatment
            && by_id.get(e.source_id.as_str()).and_then(|n| n.publication_kind) == Some(PublicationKind::Pathway)
            && by_id.get(e.target_id.as_str()).map(|n| n.node_type) == Some(NodeType::Treatment)
    });
    if !enabled {
        violations.push(Violation::TreatmentNotEnabled { network_id });
    }

    let realized = realized_chains(nodes, edges);
    if realized < required_chains {
        violations.push(Violation::ChainShortfall { network_id, required: required_chains, realized });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundtrace_common::{SynthesisConfig, TemplateSpec};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::synthesizer::Synthesizer;

    fn dataset(seed: u64) -> Dataset {
        let synth = Synthesizer::new(SynthesisConfig::seeded(seed)).unwrap();
        let spec = TemplateSpec::new("Cancer", "CAR-T", &["immunotherapy", "T-cell"], 2024, 2);
        synth.generate_catalog(&[spec]).unwrap().to_dataset().unwrap()
    }

    #[test]
    fn test_generated_network_is_clean() {
        let synth = Synthesizer::new(SynthesisConfig::seeded(42)).unwrap();
        let spec = TemplateSpec::new("Cancer", "CAR-T", &["immunotherapy", "T-cell"], 2024, 1);
        let template = fundtrace_common::NetworkTemplate::try_from(spec).unwrap();
        let graph = synth.generate_network(&template, 1, &mut StdRng::seed_from_u64(42));
        let violations = check_network(&graph);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_forward_citation_detected() {
        let mut data = dataset(3);
        let grant = data.nodes.iter().find(|n| n.node_type == NodeType::Grant).unwrap().clone();
        let pathway = data
            .nodes
            .iter()
            .find(|n| n.publication_kind == Some(PublicationKind::Funded))
            .unwrap()
            .clone();
        let newest = data
            .nodes
            .iter()
            .filter(|n| n.publication_kind == Some(PublicationKind::Pathway))
            .max_by_key(|n| n.year)
            .unwrap()
            .clone();
        assert!(newest.year > pathway.year);
        data.edges.push(EdgeRow {
            source_id: pathway.node_id.clone(),
            target_id: newest.node_id.clone(),
            edge_type: EdgeType::Cites,
            network_id: grant.network_id,
        });
        let violations = check_dataset(&data, 1);
        assert!(violations.contains(&Violation::ForwardCitation {
            source: pathway.node_id,
            target: newest.node_id,
        }));
    }

    #[test]
    fn test_missing_enablement_detected() {
        let mut data = dataset(4);
        data.edges.retain(|e| e.edge_type != EdgeType::EnablesTreatment);
        assert!(check_dataset(&data, 0).contains(&Violation::TreatmentNotEnabled { network_id: 1 }));
    }

    #[test]
    fn test_duplicate_edge_and_temporal_order_detected() {
        let mut data = dataset(5);
        let first = data.edges[0].clone();
        data.edges.push(first.clone());
        let grant_year = data.nodes[0].year;
        data.nodes[1].year = grant_year;
        let violations = check_dataset(&data, 0);
        assert!(violations.contains(&Violation::DuplicateEdge { source: first.source_id, target: first.target_id }));
        assert!(violations.iter().any(|v| matches!(v, Violation::TemporalOrder { .. })));
    }

    #[test]
    fn test_chain_shortfall_detected() {
        let mut data = dataset(6);
        data.edges.retain(|e| e.edge_type != EdgeType::LeadsToTreatment);
        let violations = check_dataset(&data, 2);
        assert!(violations.contains(&Violation::ChainShortfall { network_id: 1, required: 2, realized: 0 }));
    }

    #[test]
    fn test_missing_fields_reported() {
        let mut data = dataset(7);
        data.nodes[0].pi_name = None;
        let violations = check_dataset(&data, 0);
        assert!(violations.contains(&Violation::MissingFields {
            node_id: "GRANT_1".into(),
            fields: vec!["pi_name".into()],
        }));
        assert_eq!(violations.len(), 1);
    }
}
