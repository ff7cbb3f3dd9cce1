//! Network synthesis driver.
//!
//! [`Synthesizer::generate_network`] runs the full pipeline for one network:
//! node factory → bridge selection → guaranteed chains → probabilistic
//! citations. A [`Catalog`] is a list of networks generated from one run seed,
//! either from a single shared RNG stream or from independent per-network
//! streams that can be generated in parallel.

use fundtrace_common::{
    Dataset, FundtraceError, NetworkTemplate, Result, SummaryRow, SynthesisConfig, TemplateSpec,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::citations::{self, EdgeSet};
use crate::factory::NodeFactory;
use crate::layering;
use crate::model::NetworkGraph;
use crate::summary::{summarize_network, CatalogStats};

/// Per-network seed spread; the 64-bit golden ratio.
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// How networks of one catalog draw their randomness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// One RNG created from the run seed, networks generated in order.
    #[default]
    Shared,
    /// One RNG per network seeded from (run seed, network id).
    Independent { parallel: bool },
}

/// The seed of network `network_id` in independent mode.
pub fn network_seed(run_seed: u64, network_id: u32) -> u64 {
    run_seed ^ u64::from(network_id).wrapping_mul(SEED_SPREAD)
}

#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Generate one network. The graph is complete and immutable on return.
    pub fn generate_network<R: Rng + ?Sized>(
        &self,
        template: &NetworkTemplate,
        network_id: u32,
        rng: &mut R,
    ) -> NetworkGraph {
        let rules = &self.config.rules;
        let mut nodes =
            NodeFactory::new(template, &self.config.shape, &self.config.grant, network_id).build(rng);

        let mut edges = EdgeSet::new(network_id);
        edges.extend(nodes.structural_edges(network_id));
        let mut degradations = Vec::new();

        let requested = template.guaranteed_chains();
        let bridges = layering::select_bridges(
            &mut nodes.ecosystem,
            rules.bridge_multiplier * requested,
            rules,
            &mut degradations,
            rng,
        );
        let chains = layering::guarantee_chains(
            requested,
            &nodes.funded,
            &nodes.ecosystem,
            &nodes.pathway,
            &bridges,
            &mut edges,
            &mut degradations,
            rng,
        );

        let layers = layering::temporal_layers(&nodes.ecosystem);
        citations::layer_citations(&nodes.ecosystem, &layers, rules, &mut edges, rng);
        citations::pathway_citations(&nodes.pathway, &nodes.ecosystem, &bridges, rules, &mut edges, rng);
        citations::ecosystem_to_funded(&nodes.ecosystem, &nodes.funded, &bridges, rules, &mut edges, rng);

        debug!(
            network_id,
            layers = layers.len(),
            bridges = bridges.len(),
            edges = edges.len(),
            suppressed = edges.suppressed(),
            "Citations synthesized"
        );

        let bridge_ids = bridges.iter().map(|&i| nodes.ecosystem[i].id.clone()).collect();

        let graph = NetworkGraph::new(
            network_id,
            template.clone(),
            nodes.into_vec(),
            edges.into_edges(),
            bridge_ids,
            chains,
            degradations,
        );

        if !graph.degradations().is_empty() {
            warn!(
                network_id,
                degradations = graph.degradations().len(),
                "Network generated with degraded connectivity"
            );
        }
        info!(
            network_id,
            disease = template.disease(),
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            chains = graph.chains().len(),
            "Generated network"
        );
        graph
    }

    /// Generate a catalog in shared-stream mode.
    pub fn generate_catalog(&self, specs: &[TemplateSpec]) -> Result<Catalog> {
        self.generate(specs, SeedMode::Shared)
    }

    /// Validate every template, then generate networks `1..=n` in order.
    /// Nothing is generated if any template is invalid.
    pub fn generate(&self, specs: &[TemplateSpec], mode: SeedMode) -> Result<Catalog> {
        let templates = validate_templates(specs)?;
        info!(networks = templates.len(), ?mode, seed = ?self.config.seed, "Starting catalog generation");

        let catalog = match mode {
            SeedMode::Shared => {
                let mut rng = match self.config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let networks = templates
                    .iter()
                    .zip(1u32..)
                    .map(|(template, id)| self.generate_network(template, id, &mut rng))
                    .collect();
                Catalog { networks, seed: self.config.seed }
            }
            SeedMode::Independent { parallel } => {
                // An unseeded run still gets a concrete base seed so it can be replayed.
                let run_seed = self.config.seed.unwrap_or_else(rand::random);
                let build = |(template, id): (&NetworkTemplate, u32)| {
                    let mut rng = StdRng::seed_from_u64(network_seed(run_seed, id));
                    self.generate_network(template, id, &mut rng)
                };
                let networks = if parallel {
                    templates
                        .par_iter()
                        .enumerate()
                        .map(|(i, template)| (template, i as u32 + 1))
                        .map(build)
                        .collect()
                } else {
                    templates.iter().zip(1u32..).map(build).collect()
                };
                Catalog { networks, seed: Some(run_seed) }
            }
        };

        catalog.stats().log();
        Ok(catalog)
    }
}

fn validate_templates(specs: &[TemplateSpec]) -> Result<Vec<NetworkTemplate>> {
    if specs.is_empty() {
        return Err(FundtraceError::config("catalog contains no network templates"));
    }
    specs
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, spec)| {
            NetworkTemplate::try_from(spec).map_err(|e| match e {
                FundtraceError::Config(msg) => FundtraceError::Config(format!("network {}: {msg}", i + 1)),
                other => other,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The networks of one generation run.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub networks: Vec<NetworkGraph>,
    /// Seed the run can be replayed from, if any.
    pub seed: Option<u64>,
}

impl Catalog {
    pub fn network(&self, network_id: u32) -> Option<&NetworkGraph> {
        self.networks.iter().find(|n| n.network_id() == network_id)
    }

    pub fn summaries(&self) -> Result<Vec<SummaryRow>> {
        self.networks.iter().map(summarize_network).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_networks(&self.networks)
    }

    /// Flatten into the three relational tables plus run metadata.
    pub fn to_dataset(&self) -> Result<Dataset> {
        let nodes = self.networks.iter().flat_map(|n| n.node_rows()).collect();
        let edges = self.networks.iter().flat_map(|n| n.edge_rows()).collect();
        Ok(Dataset::new(nodes, edges, self.summaries()?, self.seed))
    }
}
