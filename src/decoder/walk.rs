use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, debug_span};

use crate::lattice::{Graph, NodeId};
use crate::scorer::Scorer;

use super::hypothesis::{detokenize, trace_path, Hypothesis};
use super::{DecodeError, DecodeResult};

const START_NODE: NodeId = 0;

/// Exact best-path walk over the lattice (Viterbi-style).
///
/// Visits nodes once each in ascending id order — a topological order,
/// because the graph only admits forward arcs — and keeps one best
/// hypothesis per node. With `normalize` set, candidates compete on
/// length-normalized score instead of raw cumulative score, and the
/// returned score is normalized to match.
///
/// Cost is one scorer call per arc, so this is the right choice when
/// scoring is cheap; see [`super::beam_search`] for the bounded-work
/// alternative.
pub fn walk<S: Scorer>(
    graph: &Graph,
    scorer: &S,
    normalize: bool,
) -> Result<DecodeResult, DecodeError> {
    let span = debug_span!("walk", sent_no = graph.sent_no(), normalize);
    let _guard = span.enter();

    let final_state = graph.final_state().ok_or(DecodeError::FinalStateUnset)?;

    let mut best: HashMap<NodeId, Rc<Hypothesis<S::State>>> = HashMap::new();
    best.insert(START_NODE, Rc::new(Hypothesis::start()));

    for node in graph.nodes_by_id() {
        debug!(node = node.id, incoming = node.incoming.len(), "processing");

        let mut node_best: Option<Rc<Hypothesis<S::State>>> = None;
        for &arc_id in &node.incoming {
            let arc = graph.arc(arc_id);
            // Arcs from tails no hypothesis has reached stay dead; only the
            // start node carries an implicit score-0 sentinel.
            let Some(prev) = best.get(&arc.tail) else {
                continue;
            };

            let (state, cost) = scorer.score(prev.state.as_ref(), arc)?;
            let candidate = Rc::new(Hypothesis {
                score: prev.score + cost,
                state,
                arc: Some(arc_id),
                path_len: prev.path_len + arc.word_count(),
                prev: Some(Rc::clone(prev)),
            });

            let better = match &node_best {
                None => true,
                Some(current) if normalize => {
                    candidate.normalized_score() > current.normalized_score()
                }
                Some(current) => candidate.score > current.score,
            };
            if better {
                debug!(node = node.id, score = candidate.score, "new best");
                node_best = Some(candidate);
            }
        }

        if let Some(item) = node_best {
            best.insert(node.id, item);
        }
    }

    let Some(winner) = best.get(&final_state) else {
        return Err(DecodeError::NoPathFound { final_state });
    };

    let arcs = trace_path(winner);
    let score = if normalize {
        winner.normalized_score()
    } else {
        winner.score
    };
    Ok(DecodeResult {
        score,
        path_len: winner.path_len,
        text: detokenize(graph, &arcs),
    })
}
