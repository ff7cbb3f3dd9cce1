//! Re-theming: point an existing network at a different disease and treatment
//! without regenerating its topology.

use fundtrace_common::{
    Dataset, FundtraceError, NetworkTemplate, NodeType, PublicationKind, Result,
};
use tracing::info;

use crate::summary::summarize_rows;

/// Return a copy of `dataset` where network `network_id` carries the
/// disease, treatment, approval year and titles of `template`.
///
/// Node ids, years (except the treatment's) and edges are untouched, so the
/// new approval year must stay after every publication of the network.
pub fn retheme_network(dataset: &Dataset, network_id: u32, template: &NetworkTemplate) -> Result<Dataset> {
    if !dataset.nodes.iter().any(|n| n.network_id == network_id) {
        return Err(FundtraceError::NetworkNotFound(network_id));
    }

    let latest_publication = dataset
        .network_nodes(network_id)
        .filter(|n| n.node_type == NodeType::Publication)
        .map(|n| n.year)
        .max();
    let approval_year = template.approval_year();
    if let Some(latest) = latest_publication {
        if approval_year <= latest {
            return Err(FundtraceError::config(format!(
                "approval year {approval_year} must be after the latest publication year {latest} of network {network_id}"
            )));
        }
    }

    let disease = template.disease();
    let treatment_name = template.treatment_name();
    let keyword = template.keyword(0);

    let mut out = dataset.clone();
    for node in out.nodes.iter_mut().filter(|n| n.network_id == network_id) {
        match node.node_type {
            NodeType::Grant => {
                node.disease = Some(disease.to_string());
                node.treatment_name = Some(treatment_name.to_string());
                node.approval_year = Some(approval_year);
                node.title = Some(format!("{} Initiative", template.grant_focus()));
            }
            NodeType::Treatment => {
                node.disease = Some(disease.to_string());
                node.treatment_name = Some(treatment_name.to_string());
                node.approval_year = Some(approval_year);
                node.year = approval_year;
            }
            NodeType::Publication => {
                node.title = match node.publication_kind {
                    Some(PublicationKind::Funded) => Some(format!(
                        "Molecular mechanisms of {keyword} in {}",
                        disease.to_lowercase()
                    )),
                    Some(PublicationKind::Pathway) => Some(format!(
                        "Clinical trial results for {disease} treatment using {treatment_name}"
                    )),
                    Some(PublicationKind::Ecosystem) => {
                        Some(format!("Translational {keyword} research: From bench to bedside"))
                    }
                    None => node.title.take(),
                };
            }
        }
    }

    let row = summarize_rows(out.network_nodes(network_id), out.network_edges(network_id))?;
    match out.summary.iter_mut().find(|s| s.network_id == network_id) {
        Some(existing) => *existing = row,
        None => {
            out.summary.push(row);
            out.summary.sort_by_key(|s| s.network_id);
        }
    }
    out.refresh_metadata();

    info!(network_id, disease, treatment = treatment_name, approval_year, "Re-themed network");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundtrace_common::{SynthesisConfig, TemplateSpec};

    use crate::synthesizer::Synthesizer;
    use crate::validate::check_dataset;

    fn dataset() -> Dataset {
        let synth = Synthesizer::new(SynthesisConfig::seeded(11)).unwrap();
        let specs = vec![
            TemplateSpec::new("Cancer", "CAR-T Cell Therapy", &["immunotherapy", "T-cell"], 2024, 1),
            TemplateSpec::new("Diabetes", "Smart Insulin Patch", &["insulin", "glucose"], 2025, 1),
        ];
        synth.generate_catalog(&specs).unwrap().to_dataset().unwrap()
    }

    fn template(approval_year: i32) -> NetworkTemplate {
        let mut spec =
            TemplateSpec::new("Parkinson's Disease", "Neuro Shield", &["dopamine", "neuron"], approval_year, 1)
                .with_grant_focus("Movement Disorder Research");
        spec.grant_year_range = (2010, 2014);
        NetworkTemplate::try_from(spec).unwrap()
    }

    #[test]
    fn test_retheme_rewrites_one_network() {
        let original = dataset();
        let updated = retheme_network(&original, 2, &template(2026)).unwrap();

        let grant = updated.nodes.iter().find(|n| n.node_id == "GRANT_2").unwrap();
        assert_eq!(grant.disease.as_deref(), Some("Parkinson's Disease"));
        assert_eq!(grant.title.as_deref(), Some("Movement Disorder Research Initiative"));

        let treatment = updated.nodes.iter().find(|n| n.node_id == "TREAT_2").unwrap();
        assert_eq!(treatment.year, 2026);

        let funded = updated.nodes.iter().find(|n| n.node_id == "PUB_2_1").unwrap();
        assert_eq!(funded.title.as_deref(), Some("Molecular mechanisms of dopamine in parkinson's disease"));

        let summary = updated.summary.iter().find(|s| s.network_id == 2).unwrap();
        assert_eq!(summary.treatment_name, "Neuro Shield");
        assert_eq!(summary.research_duration, 2026 - summary.grant_year);

        // Network 1 and all edges untouched.
        assert_eq!(updated.edges, original.edges);
        assert_eq!(updated.summary[0], original.summary[0]);
        assert!(check_dataset(&updated, 1).is_empty());
    }

    #[test]
    fn test_unknown_network_rejected() {
        let err = retheme_network(&dataset(), 9, &template(2026)).unwrap_err();
        assert!(matches!(err, FundtraceError::NetworkNotFound(9)));
    }

    #[test]
    fn test_approval_before_publications_rejected() {
        let err = retheme_network(&dataset(), 1, &template(2020)).unwrap_err();
        assert!(matches!(err, FundtraceError::Config(_)));
    }
}
