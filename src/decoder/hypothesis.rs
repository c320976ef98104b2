use std::rc::Rc;

use crate::lattice::{ArcId, Graph, EPSILON, WORD_DELIMITER};

/// A partial decoding hypothesis: one link in an immutable backpointer
/// chain rooted at the sentinel start hypothesis.
///
/// Chains are acyclic and grow only forward, so `Rc` sharing is enough —
/// several successors may reference the same predecessor, and the winning
/// chain keeps its history alive until extraction.
pub(crate) struct Hypothesis<St> {
    pub score: f64,
    pub state: Option<St>,
    /// Arc that produced this hypothesis; `None` marks the sentinel.
    pub arc: Option<ArcId>,
    /// Cumulative output word count along the chain.
    pub path_len: usize,
    pub prev: Option<Rc<Hypothesis<St>>>,
}

impl<St> Hypothesis<St> {
    /// Sentinel anchored at the start node: score 0, no arc, no history.
    pub fn start() -> Self {
        Self {
            score: 0.0,
            state: None,
            arc: None,
            path_len: 0,
            prev: None,
        }
    }

    /// Length-normalized score. A zero-length path normalizes to its raw
    /// score, avoiding the division by zero.
    pub fn normalized_score(&self) -> f64 {
        if self.path_len > 0 {
            self.score / self.path_len as f64
        } else {
            self.score
        }
    }
}

/// Follow backpointers to the sentinel and return the arc ids of the
/// winning path in forward order.
pub(crate) fn trace_path<St>(terminal: &Rc<Hypothesis<St>>) -> Vec<ArcId> {
    let mut arcs = Vec::new();
    let mut current = Some(terminal);
    while let Some(hyp) = current {
        if let Some(arc) = hyp.arc {
            arcs.push(arc);
        }
        current = hyp.prev.as_ref();
    }
    arcs.reverse();
    arcs
}

/// Flatten a path's labels into one output string: multi-word labels are
/// split on the word delimiter, `<eps>` tokens are dropped, and the
/// surviving words are joined with single spaces.
pub(crate) fn detokenize(graph: &Graph, arcs: &[ArcId]) -> String {
    let mut words: Vec<&str> = Vec::new();
    for &arc_id in arcs {
        for word in graph.arc(arc_id).label.split(WORD_DELIMITER) {
            if word != EPSILON && !word.is_empty() {
                words.push(word);
            }
        }
    }
    words.join(" ")
}
