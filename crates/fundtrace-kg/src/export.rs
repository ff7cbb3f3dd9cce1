//! Flattening of a [`NetworkGraph`] into the relational row contract.

use fundtrace_common::{EdgeRow, NodeRow, PublicationKind};

use crate::model::{Edge, NetworkGraph, Node, NodeKind};

/// Author lists are stored as one delimited column.
pub const AUTHOR_SEPARATOR: &str = "; ";

impl NetworkGraph {
    pub fn node_rows(&self) -> Vec<NodeRow> {
        self.nodes().iter().map(node_row).collect()
    }

    pub fn edge_rows(&self) -> Vec<EdgeRow> {
        self.edges().iter().map(edge_row).collect()
    }
}

pub fn node_row(node: &Node) -> NodeRow {
    let mut row = NodeRow::new(node.id.clone(), node.node_type(), node.network_id, node.year);
    match &node.kind {
        NodeKind::Grant(grant) => {
            row.grant_id = Some(grant.grant_id.clone());
            row.funding_amount = Some(grant.funding_amount);
            row.pi_name = Some(grant.pi_name.clone());
            row.title = Some(grant.title.clone());
            row.disease = Some(grant.disease.clone());
            row.treatment_name = Some(grant.treatment_name.clone());
            row.approval_year = Some(grant.approval_year);
        }
        NodeKind::Publication(publication) => {
            row.publication_kind = Some(publication.kind);
            row.title = Some(publication.title.clone());
            row.authors = Some(publication.authors.join(AUTHOR_SEPARATOR));
            row.journal = Some(publication.journal.clone());
            row.pmid = Some(publication.pmid);
            row.research_phase = Some(publication.phase);
            row.funded_by_grant = Some(publication.kind == PublicationKind::Funded);
            row.treatment_related = Some(publication.kind == PublicationKind::Pathway);
            row.citation_count = Some(publication.citation_count);
        }
        NodeKind::Treatment(treatment) => {
            row.treatment_name = Some(treatment.treatment_name.clone());
            row.approval_year = Some(treatment.approval_year);
            row.disease = Some(treatment.disease.clone());
            row.fda_approved = Some(true);
        }
    }
    row
}

pub fn edge_row(edge: &Edge) -> EdgeRow {
    EdgeRow {
        source_id: edge.source.clone(),
        target_id: edge.target.clone(),
        edge_type: edge.kind,
        network_id: edge.network_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundtrace_common::{NodeType, ResearchPhase};

    use crate::model::{Grant, Publication};

    #[test]
    fn test_publication_row_flags() {
        let node = Node {
            id: "TREAT_PUB_1_2".into(),
            network_id: 1,
            year: 2023,
            kind: NodeKind::Publication(Publication {
                kind: PublicationKind::Pathway,
                pmid: 31_415_926,
                title: "Phase II study".into(),
                authors: vec!["Dr. Maria Garcia".into(), "Dr. David Kim".into()],
                journal: "The Lancet".into(),
                phase: ResearchPhase::Treatment,
                citation_count: 0,
            }),
        };
        let row = node_row(&node);
        assert_eq!(row.node_type, NodeType::Publication);
        assert_eq!(row.authors.as_deref(), Some("Dr. Maria Garcia; Dr. David Kim"));
        assert_eq!(row.treatment_related, Some(true));
        assert_eq!(row.funded_by_grant, Some(false));
        assert_eq!(row.grant_id, None);
        assert!(row.missing_fields().is_empty());
    }

    #[test]
    fn test_grant_row_complete() {
        let node = Node {
            id: "GRANT_3".into(),
            network_id: 3,
            year: 2017,
            kind: NodeKind::Grant(Grant {
                grant_id: "INST-U01-654321".into(),
                funding_amount: 2_250_000,
                pi_name: "Dr. Rachel White".into(),
                title: "Metabolic Disease Innovation Initiative".into(),
                disease: "Diabetes".into(),
                treatment_name: "Smart Insulin Patch".into(),
                approval_year: 2025,
            }),
        };
        let row = node_row(&node);
        assert!(row.missing_fields().is_empty());
        assert_eq!(row.journal, None);
        assert_eq!(row.fda_approved, None);
    }
}
