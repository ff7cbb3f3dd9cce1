//! Temporal layering of ecosystem papers, bridge selection and the
//! guaranteed pathway → bridge → funded chains.

use std::collections::BTreeMap;

use fundtrace_common::{CitationRules, EdgeType};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::citations::EdgeSet;
use crate::model::{Degradation, GuaranteedChain, Node, NodeKind};

/// Ecosystem papers grouped by year. Values are indices into the ecosystem slice.
pub type TemporalLayers = BTreeMap<i32, Vec<usize>>;

pub fn temporal_layers(ecosystem: &[Node]) -> TemporalLayers {
    let mut layers = TemporalLayers::new();
    for (i, node) in ecosystem.iter().enumerate() {
        layers.entry(node.year).or_default().push(i);
    }
    layers
}

/// Pick `requested` bridges from the earlier half of the ecosystem papers and
/// stamp each with a synthetic citation count. Returns ecosystem indices.
pub fn select_bridges<R: Rng + ?Sized>(
    ecosystem: &mut [Node],
    requested: usize,
    rules: &CitationRules,
    degradations: &mut Vec<Degradation>,
    rng: &mut R,
) -> Vec<usize> {
    if requested == 0 || ecosystem.is_empty() {
        return Vec::new();
    }

    let mut by_year: Vec<usize> = (0..ecosystem.len()).collect();
    by_year.sort_by_key(|&i| (ecosystem[i].year, i));
    let pool_size = (ecosystem.len() / 2).max(1);
    let pool = &by_year[..pool_size];

    if requested > pool.len() {
        warn!(requested, available = pool.len(), "Bridge pool smaller than requested");
        degradations.push(Degradation::BridgePoolShort { requested, available: pool.len() });
    }

    let bridges: Vec<usize> = pool
        .choose_multiple(rng, requested.min(pool.len()))
        .copied()
        .collect();

    let (lo, hi) = rules.bridge_citation_count;
    for &i in &bridges {
        if let NodeKind::Publication(p) = &mut ecosystem[i].kind {
            p.citation_count = rng.gen_range(lo..=hi);
        }
    }
    bridges
}

/// Wire the guaranteed chains into `edges` before any probabilistic citation.
///
/// Chains beyond the pathway count are dropped; funded targets are reused
/// round-robin when there are fewer funded papers than chains. When a chain's
/// round-robin target has no bridge in its window, the other funded papers are
/// tried before falling back to a non-bridge ecosystem paper.
#[allow(clippy::too_many_arguments)]
pub fn guarantee_chains<R: Rng + ?Sized>(
    requested: usize,
    funded: &[Node],
    ecosystem: &[Node],
    pathway: &[Node],
    bridges: &[usize],
    edges: &mut EdgeSet,
    degradations: &mut Vec<Degradation>,
    rng: &mut R,
) -> Vec<GuaranteedChain> {
    if requested == 0 {
        return Vec::new();
    }

    if requested > pathway.len() {
        warn!(requested, available = pathway.len(), "Fewer pathway papers than guaranteed chains");
        degradations.push(Degradation::PathwayShort { requested, available: pathway.len() });
    }
    if requested > funded.len() {
        warn!(requested, available = funded.len(), "Fewer funded papers than guaranteed chains");
        degradations.push(Degradation::FundedShort { requested, available: funded.len() });
    }

    let targets: Vec<&Node> = funded.choose_multiple(rng, requested.min(funded.len())).collect();
    if targets.is_empty() {
        return Vec::new();
    }
    let spare: Vec<&Node> = funded
        .iter()
        .filter(|n| !targets.iter().any(|t| t.id == n.id))
        .collect();
    let bridge_nodes: Vec<&Node> = bridges.iter().map(|&b| &ecosystem[b]).collect();
    let all_ecosystem: Vec<&Node> = ecosystem.iter().collect();

    let mut chains = Vec::new();
    for (i, source) in pathway.iter().take(requested).enumerate() {
        let rotation = i % targets.len();
        let candidates: Vec<&Node> = targets[rotation..]
            .iter()
            .chain(&targets[..rotation])
            .chain(&spare)
            .copied()
            .collect();

        let (via, target) = match first_fit(&candidates, &bridge_nodes, source, rng) {
            Some(pair) => pair,
            None => match first_fit(&candidates, &all_ecosystem, source, rng) {
                Some((paper, target)) => {
                    warn!(pathway = %source.id, via = %paper.id, "No bridge fits any chain window; using ecosystem paper");
                    degradations.push(Degradation::BridgeFallback {
                        pathway: source.id.clone(),
                        via: paper.id.clone(),
                    });
                    (paper, target)
                }
                None => {
                    warn!(pathway = %source.id, "No ecosystem paper fits any chain window");
                    degradations.push(Degradation::ChainUnbuildable { pathway: source.id.clone() });
                    continue;
                }
            },
        };

        edges.insert(&source.id, &via.id, EdgeType::LeadsToTreatment);
        edges.insert(&via.id, &target.id, EdgeType::Cites);
        chains.push(GuaranteedChain {
            pathway: source.id.clone(),
            bridge: via.id.clone(),
            funded: target.id.clone(),
        });
    }
    chains
}

/// First target, in candidate order, with some `via` paper dated in
/// `[target.year, source.year]`. Returns `(via, target)`.
fn first_fit<'a, R: Rng + ?Sized>(
    candidates: &[&'a Node],
    via_pool: &[&'a Node],
    source: &Node,
    rng: &mut R,
) -> Option<(&'a Node, &'a Node)> {
    candidates.iter().find_map(|&target| {
        let fitting: Vec<&'a Node> = via_pool
            .iter()
            .copied()
            .filter(|n| n.year >= target.year && n.year <= source.year)
            .collect();
        fitting.choose(rng).map(|&via| (via, target))
    })
}
