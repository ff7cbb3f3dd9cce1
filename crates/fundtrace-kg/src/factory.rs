//! Node factory: mints the grant, publications and treatment of one network.
//!
//! Years are drawn so the temporal invariant holds by construction:
//! grant < funded ≤ approval-2, grant+2 ≤ ecosystem ≤ approval-2, and every
//! pathway paper is strictly later than all funded and ecosystem papers while
//! staying before the approval year.

use fundtrace_common::{
    EdgeType, GrantParams, NetworkShape, NetworkTemplate, PublicationKind, ResearchPhase,
};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Edge, Grant, Node, NodeKind, Publication, Treatment};
use crate::vocab;

const PMID_RANGE: std::ops::RangeInclusive<u32> = 10_000_000..=99_999_999;
const GRANT_NUMBER_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// All nodes of one network, grouped by role.
#[derive(Debug, Clone)]
pub struct NetworkNodes {
    pub grant: Node,
    pub funded: Vec<Node>,
    pub ecosystem: Vec<Node>,
    pub pathway: Vec<Node>,
    pub treatment: Node,
}

impl NetworkNodes {
    /// Edges implied by node roles alone: grant → funded paper (`funded_by`)
    /// and pathway paper → treatment (`enables_treatment`).
    pub fn structural_edges(&self, network_id: u32) -> Vec<Edge> {
        let funded = self.funded.iter().map(|p| Edge {
            source: self.grant.id.clone(),
            target: p.id.clone(),
            kind: EdgeType::FundedBy,
            network_id,
        });
        let enables = self.pathway.iter().map(|p| Edge {
            source: p.id.clone(),
            target: self.treatment.id.clone(),
            kind: EdgeType::EnablesTreatment,
            network_id,
        });
        funded.chain(enables).collect()
    }

    /// Grant, funded, ecosystem, pathway, treatment; the export order.
    pub fn into_vec(self) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(2 + self.funded.len() + self.ecosystem.len() + self.pathway.len());
        nodes.push(self.grant);
        nodes.extend(self.funded);
        nodes.extend(self.ecosystem);
        nodes.extend(self.pathway);
        nodes.push(self.treatment);
        nodes
    }

    pub fn publication_count(&self) -> usize {
        self.funded.len() + self.ecosystem.len() + self.pathway.len()
    }
}

pub struct NodeFactory<'a> {
    template: &'a NetworkTemplate,
    shape: &'a NetworkShape,
    grant_params: &'a GrantParams,
    network_id: u32,
}

impl<'a> NodeFactory<'a> {
    pub fn new(
        template: &'a NetworkTemplate,
        shape: &'a NetworkShape,
        grant_params: &'a GrantParams,
        network_id: u32,
    ) -> Self {
        Self { template, shape, grant_params, network_id }
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> NetworkNodes {
        let (start, end) = self.template.grant_years();
        let grant_year = rng.gen_range(start..=end);
        let approval_year = self.template.approval_year();

        let grant = self.grant(grant_year, rng);

        let funded: Vec<Node> = (1..=self.shape.funded_publications)
            .map(|i| {
                let hi = (grant_year + 3).min(approval_year - 2);
                let year = rng.gen_range(grant_year + 1..=hi);
                self.publication(PublicationKind::Funded, i, year, ResearchPhase::Basic, rng)
            })
            .collect();

        let ecosystem: Vec<Node> = (1..=self.shape.ecosystem_publications)
            .map(|i| {
                let year = triangular_year(grant_year + 2, approval_year - 2, rng);
                let phase = if rng.gen_bool(self.shape.translational_share) {
                    ResearchPhase::Translational
                } else {
                    ResearchPhase::Basic
                };
                self.publication(PublicationKind::Ecosystem, i, year, phase, rng)
            })
            .collect();

        let latest_prior = funded
            .iter()
            .chain(ecosystem.iter())
            .map(|n| n.year)
            .max()
            .unwrap_or(grant_year);

        let pathway: Vec<Node> = (1..=self.shape.pathway_publications)
            .map(|i| {
                let drawn = rng.gen_range(approval_year - 3..=approval_year - 1);
                let year = drawn.max(latest_prior + 1);
                self.publication(PublicationKind::Pathway, i, year, ResearchPhase::Treatment, rng)
            })
            .collect();

        let treatment = Node {
            id: format!("TREAT_{}", self.network_id),
            network_id: self.network_id,
            year: approval_year,
            kind: NodeKind::Treatment(Treatment {
                treatment_name: self.template.treatment_name().to_string(),
                disease: self.template.disease().to_string(),
                approval_year,
            }),
        };

        NetworkNodes { grant, funded, ecosystem, pathway, treatment }
    }

    fn grant<R: Rng + ?Sized>(&self, year: i32, rng: &mut R) -> Node {
        let prefix = self
            .grant_params
            .id_prefixes
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("INST-R01");
        let grant_id = format!("{prefix}-{:06}", rng.gen_range(GRANT_NUMBER_RANGE));
        let funding_amount = rng.gen_range(self.grant_params.funding_min..=self.grant_params.funding_max);

        Node {
            id: format!("GRANT_{}", self.network_id),
            network_id: self.network_id,
            year,
            kind: NodeKind::Grant(Grant {
                grant_id,
                funding_amount,
                pi_name: vocab::principal_investigator(rng),
                title: format!("{} Initiative", self.template.grant_focus()),
                disease: self.template.disease().to_string(),
                treatment_name: self.template.treatment_name().to_string(),
                approval_year: self.template.approval_year(),
            }),
        }
    }

    fn publication<R: Rng + ?Sized>(
        &self,
        kind: PublicationKind,
        index: usize,
        year: i32,
        phase: ResearchPhase,
        rng: &mut R,
    ) -> Node {
        Node {
            id: format!("{}_{}_{}", kind.id_prefix(), self.network_id, index),
            network_id: self.network_id,
            year,
            kind: NodeKind::Publication(Publication {
                kind,
                pmid: rng.gen_range(PMID_RANGE),
                title: vocab::title(self.template, phase, rng),
                authors: vocab::authors(self.shape.authors_per_paper, rng),
                journal: vocab::journal(rng),
                phase,
                citation_count: 0,
            }),
        }
    }
}

/// Year in `lo..=hi` drawn with weights `min(i+1, n-i)`, peaking mid-window.
/// An empty window collapses to `lo`.
pub fn triangular_year<R: Rng + ?Sized>(lo: i32, hi: i32, rng: &mut R) -> i32 {
    if hi <= lo {
        return lo;
    }
    let n = u64::from(hi.abs_diff(lo)) + 1;
    let weight = |i: u64| (i + 1).min(n - i);
    let total: u64 = (0..n).map(weight).sum();
    let mut roll = rng.gen_range(0..total);
    for i in 0..n {
        let w = weight(i);
        if roll < w {
            return i32::try_from(i64::from(lo) + i as i64).unwrap_or(hi);
        }
        roll -= w;
    }
    hi
}
