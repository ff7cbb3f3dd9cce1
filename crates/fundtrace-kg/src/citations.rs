//! Probabilistic citation synthesis.
//!
//! Every step draws independent Bernoulli trials; out-degree is never
//! renormalised. All edges pass through [`EdgeSet`], which drops any
//! candidate whose (source, target) pair was already emitted, so edges added
//! earlier (the structural and guaranteed ones) always win.

use ahash::AHashSet;
use fundtrace_common::{CitationRules, EdgeType};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::layering::TemporalLayers;
use crate::model::{Edge, Node};

/// Insertion-ordered edge list with (source, target) de-duplication.
#[derive(Debug)]
pub struct EdgeSet {
    network_id: u32,
    edges: Vec<Edge>,
    seen: AHashSet<(String, String)>,
    suppressed: usize,
}

impl EdgeSet {
    pub fn new(network_id: u32) -> Self {
        Self {
            network_id,
            edges: Vec::new(),
            seen: AHashSet::new(),
            suppressed: 0,
        }
    }

    /// Returns `false` when the pair already exists and the edge was dropped.
    pub fn insert(&mut self, source: &str, target: &str, kind: EdgeType) -> bool {
        if !self.seen.insert((source.to_string(), target.to_string())) {
            self.suppressed += 1;
            return false;
        }
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            network_id: self.network_id,
        });
        true
    }

    pub fn extend(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            self.insert(&edge.source, &edge.target, edge.kind);
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Candidates dropped as duplicates so far.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

/// Ecosystem → ecosystem `cites` edges between year layers.
///
/// For each ordered pair (current layer, strictly earlier layer) and each paper
/// of the current layer, draw `k` in `0..=max_layer_citations`; when `k > 0`
/// and the gap trial succeeds, cite `min(k, layer size)` distinct papers.
pub fn layer_citations<R: Rng + ?Sized>(
    ecosystem: &[Node],
    layers: &TemporalLayers,
    rules: &CitationRules,
    edges: &mut EdgeSet,
    rng: &mut R,
) {
    for (&year, current) in layers {
        for (&earlier_year, earlier) in layers.range(..year) {
            let p = rules.probability_for_gap(year - earlier_year);
            for &source in current {
                let k = rng.gen_range(0..=rules.max_layer_citations);
                if k == 0 || !rng.gen_bool(p) {
                    continue;
                }
                for &target in earlier.choose_multiple(rng, k.min(earlier.len())) {
                    edges.insert(&ecosystem[source].id, &ecosystem[target].id, EdgeType::Cites);
                }
            }
        }
    }
}

/// Pathway → ecosystem `leads_to_treatment` edges.
///
/// The target pool is every bridge plus the `recent_pool_size` most recent
/// ecosystem papers older than the pathway paper.
pub fn pathway_citations<R: Rng + ?Sized>(
    pathway: &[Node],
    ecosystem: &[Node],
    bridges: &[usize],
    rules: &CitationRules,
    edges: &mut EdgeSet,
    rng: &mut R,
) {
    let mut newest_first: Vec<usize> = (0..ecosystem.len()).collect();
    newest_first.sort_by_key(|&i| (std::cmp::Reverse(ecosystem[i].year), i));

    let (lo, hi) = rules.pathway_citations;
    for source in pathway {
        let mut pool: Vec<usize> = bridges.to_vec();
        let recent = newest_first
            .iter()
            .copied()
            .filter(|&i| ecosystem[i].year < source.year)
            .take(rules.recent_pool_size);
        for i in recent {
            if !pool.contains(&i) {
                pool.push(i);
            }
        }

        let k = rng.gen_range(lo..=hi);
        for &target in pool.choose_multiple(rng, k.min(pool.len())) {
            edges.insert(&source.id, &ecosystem[target].id, EdgeType::LeadsToTreatment);
        }
    }
}

/// Non-bridge ecosystem → funded `cites` edges, one trial per strictly
/// earlier funded paper.
pub fn ecosystem_to_funded<R: Rng + ?Sized>(
    ecosystem: &[Node],
    funded: &[Node],
    bridges: &[usize],
    rules: &CitationRules,
    edges: &mut EdgeSet,
    rng: &mut R,
) {
    for (i, source) in ecosystem.iter().enumerate() {
        if bridges.contains(&i) {
            continue;
        }
        for target in funded {
            if target.year < source.year && rng.gen_bool(rules.ecosystem_to_grant_probability) {
                edges.insert(&source.id, &target.id, EdgeType::Cites);
            }
        }
    }
}
