//! Typed node and edge model of one synthesized network.

use ahash::AHashMap;
use fundtrace_common::{EdgeType, NetworkTemplate, NodeType, PublicationKind, ResearchPhase};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grant {
    pub grant_id: String,
    pub funding_amount: u64,
    pub pi_name: String,
    pub title: String,
    pub disease: String,
    pub treatment_name: String,
    pub approval_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publication {
    pub kind: PublicationKind,
    pub pmid: u32,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub phase: ResearchPhase,
    /// Synthetic influence marker; non-zero only for bridge papers.
    pub citation_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Treatment {
    pub treatment_name: String,
    pub disease: String,
    pub approval_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Grant(Grant),
    Publication(Publication),
    Treatment(Treatment),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub network_id: u32,
    pub year: i32,
    pub kind: NodeKind,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Grant(_) => NodeType::Grant,
            NodeKind::Publication(_) => NodeType::Publication,
            NodeKind::Treatment(_) => NodeType::Treatment,
        }
    }

    pub fn as_publication(&self) -> Option<&Publication> {
        match &self.kind {
            NodeKind::Publication(p) => Some(p),
            _ => None,
        }
    }

    pub fn publication_kind(&self) -> Option<PublicationKind> {
        self.as_publication().map(|p| p.kind)
    }

    pub fn is_publication_of(&self, kind: PublicationKind) -> bool {
        self.publication_kind() == Some(kind)
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeType,
    pub network_id: u32,
}

/// An explicit pathway → bridge → funded path wired during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuaranteedChain {
    pub pathway: String,
    pub bridge: String,
    pub funded: String,
}

/// A non-fatal shortfall against the requested connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Degradation {
    /// Fewer early ecosystem papers than bridges requested.
    BridgePoolShort { requested: usize, available: usize },
    /// Fewer pathway papers than guaranteed chains requested.
    PathwayShort { requested: usize, available: usize },
    /// Fewer funded papers than guaranteed chains requested; targets are reused.
    FundedShort { requested: usize, available: usize },
    /// No bridge fit the year window of any funded paper; a non-bridge
    /// ecosystem paper was used.
    BridgeFallback { pathway: String, via: String },
    /// No funded paper precedes any ecosystem paper dated at or before this
    /// pathway paper.
    ChainUnbuildable { pathway: String },
}

// ---------------------------------------------------------------------------
// Network graph
// ---------------------------------------------------------------------------

/// One complete, immutable network.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    network_id: u32,
    template: NetworkTemplate,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    bridges: Vec<String>,
    chains: Vec<GuaranteedChain>,
    degradations: Vec<Degradation>,
    index: AHashMap<String, usize>,
}

impl NetworkGraph {
    pub(crate) fn new(
        network_id: u32,
        template: NetworkTemplate,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        bridges: Vec<String>,
        chains: Vec<GuaranteedChain>,
        degradations: Vec<Degradation>,
    ) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self { network_id, template, nodes, edges, bridges, chains, degradations, index }
    }

    pub fn network_id(&self) -> u32 { self.network_id }
    pub fn template(&self) -> &NetworkTemplate { &self.template }
    pub fn nodes(&self) -> &[Node] { &self.nodes }
    pub fn edges(&self) -> &[Edge] { &self.edges }
    /// Ids of the ecosystem papers selected as bridges.
    pub fn bridges(&self) -> &[String] { &self.bridges }
    pub fn chains(&self) -> &[GuaranteedChain] { &self.chains }
    pub fn degradations(&self) -> &[Degradation] { &self.degradations }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn grant(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.node_type() == NodeType::Grant)
    }

    pub fn funding_amount(&self) -> u64 {
        match self.grant().map(|n| &n.kind) {
            Some(NodeKind::Grant(g)) => g.funding_amount,
            _ => 0,
        }
    }

    pub fn treatment(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.node_type() == NodeType::Treatment)
    }

    pub fn publications(&self, kind: PublicationKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.is_publication_of(kind))
    }

    pub fn edges_of(&self, kind: EdgeType) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}
