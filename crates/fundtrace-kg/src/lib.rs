//! fundtrace-kg — Synthetic grant → publication → treatment citation networks.
//!
//! One network is produced in a single pass by [`Synthesizer::generate_network`]:
//! the node factory mints the grant, publications and treatment, the temporal
//! layering step picks bridge papers and wires the guaranteed chains, and the
//! citation step fills in the probabilistic edges. The finished
//! [`NetworkGraph`] is read-only; it is exported to relational rows via
//! [`Catalog::to_dataset`] and checked with [`validate`].

pub mod model;
pub mod vocab;
pub mod factory;
pub mod layering;
pub mod citations;
pub mod summary;
pub mod synthesizer;
pub mod export;
pub mod validate;
pub mod retheme;

pub use model::{Degradation, Edge, GuaranteedChain, NetworkGraph, Node, NodeKind};
pub use summary::{summarize_network, CatalogStats};
pub use synthesizer::{Catalog, SeedMode, Synthesizer};
pub use validate::{check_dataset, check_network, Violation};
pub use retheme::retheme_network;
