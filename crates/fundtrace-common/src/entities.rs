/// Entity kinds shared by the synthesizer and the relational tables.
/// The string forms are the values stored in the `node_type`, `edge_type`,
/// `publication_kind` and `research_phase` columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FundtraceError;

// ---------------------------------------------------------------------------
// Node type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Grant,
    Publication,
    Treatment,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Grant => "grant",
            NodeType::Publication => "publication",
            NodeType::Treatment => "treatment",
        }
    }
}

// ---------------------------------------------------------------------------
// Edge type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// grant → funded publication
    FundedBy,
    /// publication → publication, never forward in time
    Cites,
    /// pathway publication → ecosystem publication
    LeadsToTreatment,
    /// pathway publication → treatment
    EnablesTreatment,
}

impl EdgeType {
    pub const ALL: [EdgeType; 4] = [
        EdgeType::FundedBy,
        EdgeType::Cites,
        EdgeType::LeadsToTreatment,
        EdgeType::EnablesTreatment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::FundedBy => "funded_by",
            EdgeType::Cites => "cites",
            EdgeType::LeadsToTreatment => "leads_to_treatment",
            EdgeType::EnablesTreatment => "enables_treatment",
        }
    }
}

// ---------------------------------------------------------------------------
// Publication subtype
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationKind {
    /// Directly supported by the grant.
    Funded,
    /// Written during late-stage treatment development.
    Pathway,
    /// Broader citing literature.
    Ecosystem,
}

impl PublicationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationKind::Funded => "funded",
            PublicationKind::Pathway => "pathway",
            PublicationKind::Ecosystem => "ecosystem",
        }
    }

    /// Id prefix used when minting node ids, e.g. `ECO_2_17`.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            PublicationKind::Funded => "PUB",
            PublicationKind::Pathway => "TREAT_PUB",
            PublicationKind::Ecosystem => "ECO",
        }
    }
}

// ---------------------------------------------------------------------------
// Research phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchPhase {
    Basic,
    Translational,
    Treatment,
}

impl ResearchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchPhase::Basic => "basic",
            ResearchPhase::Translational => "translational",
            ResearchPhase::Treatment => "treatment",
        }
    }
}

// ---------------------------------------------------------------------------
// String conversions
// ---------------------------------------------------------------------------

macro_rules! impl_str_conversions {
    ($ty:ty, $label:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = FundtraceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| FundtraceError::config(format!("unknown {}: {s}", $label)))
            }
        }
    };
}

impl_str_conversions!(NodeType, "node type", [NodeType::Grant, NodeType::Publication, NodeType::Treatment]);
impl_str_conversions!(EdgeType, "edge type", [
    EdgeType::FundedBy,
    EdgeType::Cites,
    EdgeType::LeadsToTreatment,
    EdgeType::EnablesTreatment,
]);
impl_str_conversions!(PublicationKind, "publication kind", [
    PublicationKind::Funded,
    PublicationKind::Pathway,
    PublicationKind::Ecosystem,
]);
impl_str_conversions!(ResearchPhase, "research phase", [
    ResearchPhase::Basic,
    ResearchPhase::Translational,
    ResearchPhase::Treatment,
]);
