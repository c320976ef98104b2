//! Rescoring engine for weighted word lattices.
//!
//! A [`lattice::Graph`] holds one sentence's search graph (a forward-only
//! weighted DAG). Two decoders re-decode it under a pluggable
//! [`scorer::Scorer`]: [`decoder::walk`] finds the exact best path, and
//! [`decoder::beam_search`] trades optimality for bounded work by pruning
//! hypotheses per output-length bucket. [`loader::read_graph`] parses the
//! OpenFST-style text format such graphs are shipped in.

pub mod decoder;
pub mod lattice;
pub mod loader;
pub mod scorer;
pub mod trace_init;

pub use decoder::{beam_search, walk, DecodeError, DecodeResult};
pub use lattice::{Arc, Graph, GraphError, Node, NodeId};
pub use loader::{read_graph, LoadError};
pub use scorer::{IdentityScorer, ScoreError, Scorer};
