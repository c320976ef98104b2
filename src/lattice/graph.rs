use std::collections::HashMap;

use super::GraphError;

/// Node identifier as assigned by the search-graph producer.
pub type NodeId = usize;

/// Index into the graph's arc arena.
pub type ArcId = usize;

/// Word separator inside a multi-word arc label.
pub const WORD_DELIMITER: char = '_';

/// Label of a pass-through (epsilon) transition.
pub const EPSILON: &str = "<eps>";

/// A directed edge of the lattice.
///
/// The label may carry several output words joined by [`WORD_DELIMITER`];
/// the weight follows the higher-is-better convention (loaders reading raw
/// costs must negate them before insertion).
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub tail: NodeId,
    pub head: NodeId,
    pub label: String,
    pub weight: f64,
}

impl Arc {
    /// Number of output words this arc emits.
    ///
    /// An `<eps>` label counts as one word here (it only disappears at
    /// detokenization time), so epsilon arcs lengthen the path for
    /// normalization purposes.
    pub fn word_count(&self) -> usize {
        self.label.split(WORD_DELIMITER).count()
    }
}

/// A lattice vertex with its adjacency lists.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    /// Arcs leaving this node, in insertion order.
    pub outgoing: Vec<ArcId>,
    /// Arcs entering this node, in insertion order.
    pub incoming: Vec<ArcId>,
}

impl Node {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }
}

/// One sentence's search graph: an arc arena plus lazily created nodes.
///
/// Node 0 is the start node and exists from construction. All other nodes
/// appear when first referenced by an arc. Arcs must point forward
/// (`tail < head`), which makes ascending node id a topological order and
/// is what the exact walker relies on.
#[derive(Debug)]
pub struct Graph {
    sent_no: usize,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    arcs: Vec<Arc>,
    final_state: Option<NodeId>,
}

impl Graph {
    pub fn new(sent_no: usize) -> Self {
        let mut graph = Self {
            sent_no,
            nodes: Vec::new(),
            index: HashMap::new(),
            arcs: Vec::new(),
            final_state: None,
        };
        graph.node_entry(0);
        graph
    }

    /// Sentence identifier this graph was built for.
    pub fn sent_no(&self) -> usize {
        self.sent_no
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn final_state(&self) -> Option<NodeId> {
        self.final_state
    }

    pub fn set_final_state(&mut self, id: NodeId) {
        self.node_entry(id);
        self.final_state = Some(id);
    }

    /// Get-or-create a node. This is the only path that creates nodes, so
    /// `nodes` stays an accurate discovery-order record.
    fn node_entry(&mut self, id: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node::new(id));
        self.index.insert(id, idx);
        idx
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id]
    }

    /// Append an arc, creating both endpoint nodes as needed. Parallel arcs
    /// between the same node pair are allowed (multigraph semantics).
    pub fn add_arc(
        &mut self,
        tail: NodeId,
        head: NodeId,
        label: impl Into<String>,
        weight: f64,
    ) -> Result<(), GraphError> {
        if tail >= head {
            return Err(GraphError::BackwardArc { tail, head });
        }
        let arc_id = self.arcs.len();
        self.arcs.push(Arc {
            tail,
            head,
            label: label.into(),
            weight,
        });
        let tail_idx = self.node_entry(tail);
        self.nodes[tail_idx].outgoing.push(arc_id);
        let head_idx = self.node_entry(head);
        self.nodes[head_idx].incoming.push(arc_id);
        Ok(())
    }

    /// Nodes in ascending id order. Because every arc points forward, this
    /// is a topological order of the DAG.
    pub fn nodes_by_id(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.iter().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }
}
