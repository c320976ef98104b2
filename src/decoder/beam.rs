use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use tracing::{debug, debug_span};

use crate::lattice::{Graph, NodeId};
use crate::scorer::Scorer;

use super::hypothesis::{detokenize, trace_path, Hypothesis};
use super::{DecodeError, DecodeResult};

const START_NODE: NodeId = 0;

/// Heap entry: highest score first, ties broken by insertion order so a
/// run is deterministic. `BinaryHeap` is a max-heap, so `cmp` puts the
/// best-ranked entry on top.
struct Ranked<St> {
    score: OrderedFloat<f64>,
    seq: u64,
    hyp: Rc<Hypothesis<St>>,
}

impl<St> Ranked<St> {
    fn new(hyp: Rc<Hypothesis<St>>, seq: u64) -> Self {
        Self {
            score: OrderedFloat(hyp.score),
            seq,
            hyp,
        }
    }
}

impl<St> PartialEq for Ranked<St> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl<St> Eq for Ranked<St> {}

impl<St> PartialOrd for Ranked<St> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<St> Ord for Ranked<St> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Beam-limited search with hypotheses bucketed by output word count.
///
/// Competing hypotheses that reach different lattice nodes but have
/// produced the same number of words share a bucket and are pruned against
/// each other, so total work is bounded by
/// `max_path_len * beam * average out-degree` regardless of node count —
/// the trade that makes expensive stateful scorers affordable.
///
/// Expansions landing on a node with no outgoing arcs go to a separate
/// finals queue; the best finals entry is the result, scored raw (no
/// length normalization).
pub fn beam_search<S: Scorer>(
    graph: &Graph,
    scorer: &S,
    beam: usize,
) -> Result<DecodeResult, DecodeError> {
    let span = debug_span!("beam_search", sent_no = graph.sent_no(), beam);
    let _guard = span.enter();

    let final_state = graph.final_state().ok_or(DecodeError::FinalStateUnset)?;

    let mut buckets: Vec<BinaryHeap<Ranked<S::State>>> = vec![BinaryHeap::new()];
    let mut finals: BinaryHeap<Ranked<S::State>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    buckets[0].push(Ranked::new(Rc::new(Hypothesis::start()), seq));

    let mut bucket_idx = 0;
    while bucket_idx < buckets.len() {
        let mut pops = 0;
        while pops < beam {
            let Some(entry) = buckets[bucket_idx].pop() else {
                break;
            };
            pops += 1;

            let hyp = entry.hyp;
            let node_id = match hyp.arc {
                Some(arc_id) => graph.arc(arc_id).head,
                None => START_NODE,
            };
            // The node exists: it was created when its arc was added.
            let node = graph.node(node_id).expect("hypothesis node must exist");
            debug!(
                bucket = bucket_idx,
                node = node_id,
                score = hyp.score,
                outgoing = node.outgoing.len(),
                "expanding"
            );

            for &arc_id in &node.outgoing {
                let arc = graph.arc(arc_id);
                let (state, cost) = scorer.score(hyp.state.as_ref(), arc)?;
                let next = Rc::new(Hypothesis {
                    score: hyp.score + cost,
                    state,
                    arc: Some(arc_id),
                    path_len: hyp.path_len + arc.word_count(),
                    prev: Some(Rc::clone(&hyp)),
                });
                seq += 1;

                let head = graph.node(arc.head).expect("arc head must exist");
                if head.outgoing.is_empty() {
                    finals.push(Ranked::new(next, seq));
                } else {
                    if next.path_len >= buckets.len() {
                        buckets.resize_with(next.path_len + 1, BinaryHeap::new);
                    }
                    buckets[next.path_len].push(Ranked::new(next, seq));
                }
            }
        }
        bucket_idx += 1;
    }

    let Some(winner) = finals.pop() else {
        return Err(DecodeError::NoPathFound { final_state });
    };

    let arcs = trace_path(&winner.hyp);
    Ok(DecodeResult {
        score: winner.hyp.score,
        path_len: winner.hyp.path_len,
        text: detokenize(graph, &arcs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::testutil::{chain_graph, diamond_graph, parallel_arc_graph, FlagScorer};
    use crate::decoder::walk;
    use crate::scorer::IdentityScorer;

    #[test]
    fn test_beam_simple_chain() {
        let graph = chain_graph(&[("x", 1.0), ("y", 1.0)]);
        let result = beam_search(&graph, &IdentityScorer, 4).unwrap();
        assert_eq!(result.score, 2.0);
        assert_eq!(result.text, "x y");
    }

    #[test]
    fn test_beam_width_one_single_competitor_per_bucket() {
        let graph = parallel_arc_graph();
        let result = beam_search(&graph, &IdentityScorer, 1).unwrap();
        assert_eq!(result.score, 2.0);
        assert_eq!(result.text, "b <eos>");
    }

    #[test]
    fn test_beam_converges_to_walk_with_wide_beam() {
        for graph in [diamond_graph(), parallel_arc_graph()] {
            let exact = walk(&graph, &IdentityScorer, false).unwrap();
            let approx = beam_search(&graph, &IdentityScorer, 1_000).unwrap();
            assert_eq!(approx.score, exact.score);
            assert_eq!(approx.text, exact.text);
        }
    }

    #[test]
    fn test_beam_buckets_by_length_not_node() {
        // A one-arc path and a two-arc path reach the merge node with the
        // same word count only if multi-word labels are counted; the long
        // cheap path must still lose to the short good one inside a shared
        // bucket at beam 1.
        let mut graph = Graph::new(0);
        graph.add_arc(0, 1, "two_words", 3.0).unwrap();
        graph.add_arc(0, 2, "one", 1.0).unwrap();
        graph.add_arc(2, 3, "more", 1.0).unwrap();
        graph.add_arc(1, 4, "end", 0.0).unwrap();
        graph.add_arc(3, 4, "end", 0.0).unwrap();
        graph.set_final_state(4);

        let result = beam_search(&graph, &IdentityScorer, 1).unwrap();
        assert_eq!(result.text, "two words end");
        assert_eq!(result.score, 3.0);
    }

    #[test]
    fn test_beam_final_state_unset() {
        let mut graph = Graph::new(0);
        graph.add_arc(0, 1, "a", 1.0).unwrap();
        assert!(matches!(
            beam_search(&graph, &IdentityScorer, 4),
            Err(DecodeError::FinalStateUnset)
        ));
    }

    #[test]
    fn test_beam_no_terminal_hypothesis() {
        // Start node has no outgoing arcs at all
        let mut graph = Graph::new(0);
        graph.set_final_state(0);
        assert!(matches!(
            beam_search(&graph, &IdentityScorer, 4),
            Err(DecodeError::NoPathFound { .. })
        ));
    }

    #[test]
    fn test_beam_threads_scorer_state() {
        let mut graph = Graph::new(0);
        graph.add_arc(0, 1, "flag", 0.0).unwrap();
        graph.add_arc(0, 2, "plain", 0.5).unwrap();
        graph.add_arc(1, 3, "bonus", 0.0).unwrap();
        graph.add_arc(2, 3, "bonus", 0.0).unwrap();
        graph.add_arc(3, 4, "<eos>", 0.0).unwrap();
        graph.set_final_state(4);

        let result = beam_search(&graph, &FlagScorer, 8).unwrap();
        assert_eq!(result.text, "flag bonus <eos>");
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn test_beam_deterministic_on_ties() {
        let mut graph = Graph::new(0);
        graph.add_arc(0, 1, "a", 1.0).unwrap();
        graph.add_arc(0, 1, "b", 1.0).unwrap();
        graph.add_arc(1, 2, "<eos>", 0.0).unwrap();
        graph.set_final_state(2);

        let first = beam_search(&graph, &IdentityScorer, 2).unwrap();
        assert_eq!(first.score, 1.0);
        for _ in 0..5 {
            let again = beam_search(&graph, &IdentityScorer, 2).unwrap();
            assert_eq!(again.text, first.text, "tie-break must be stable per run");
        }
    }

    #[test]
    fn test_ranked_orders_by_score_then_insertion() {
        let mk = |score: f64, seq: u64| {
            let mut hyp: Hypothesis<()> = Hypothesis::start();
            hyp.score = score;
            Ranked::new(Rc::new(hyp), seq)
        };
        let mut heap = BinaryHeap::new();
        heap.push(mk(1.0, 2));
        heap.push(mk(3.0, 1));
        heap.push(mk(3.0, 0));
        heap.push(mk(2.0, 3));

        // Best score first; equal scores pop in insertion order
        let order: Vec<(f64, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|r| (r.score.0, r.seq))
            .collect();
        assert_eq!(order, vec![(3.0, 0), (3.0, 1), (2.0, 3), (1.0, 2)]);
    }
}
