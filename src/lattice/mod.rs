mod graph;

pub use graph::{Arc, ArcId, Graph, Node, NodeId, EPSILON, WORD_DELIMITER};

/// Errors raised while building a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An arc whose tail id is not strictly below its head id. Search-graph
    /// producers number nodes so that every arc points forward; the exact
    /// walker depends on that ordering, so it is checked here rather than
    /// assumed.
    #[error("backward arc {tail} -> {head} breaks the node ordering invariant")]
    BackwardArc { tail: NodeId, head: NodeId },
}
