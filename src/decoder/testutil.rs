//! Shared fixtures for decoder tests.

use crate::lattice::{Arc, Graph};
use crate::scorer::{ScoreError, Scorer};

/// Straight-line graph: one arc per (label, weight) pair, final state at
/// the last node.
pub(crate) fn chain_graph(arcs: &[(&str, f64)]) -> Graph {
    let mut graph = Graph::new(0);
    for (i, (label, weight)) in arcs.iter().enumerate() {
        graph.add_arc(i, i + 1, *label, *weight).unwrap();
    }
    graph.set_final_state(arcs.len());
    graph
}

/// Two parallel arcs into a shared `<eos>` arc; the heavier label "b"
/// should win.
pub(crate) fn parallel_arc_graph() -> Graph {
    let mut graph = Graph::new(0);
    graph.add_arc(0, 1, "a", 0.5).unwrap();
    graph.add_arc(0, 1, "b", 2.0).unwrap();
    graph.add_arc(1, 2, "<eos>", 0.0).unwrap();
    graph.set_final_state(2);
    graph
}

/// Two-branch diamond: upper path scores 2.0, lower path 2.5.
pub(crate) fn diamond_graph() -> Graph {
    let mut graph = Graph::new(0);
    graph.add_arc(0, 1, "hi1", 1.0).unwrap();
    graph.add_arc(1, 3, "hi2", 1.0).unwrap();
    graph.add_arc(0, 2, "lo1", 0.5).unwrap();
    graph.add_arc(2, 3, "lo2", 2.0).unwrap();
    graph.set_final_state(3);
    graph
}

/// Stateful scorer for exercising state threading: scoring a "flag" arc
/// sets the flag in the returned state, and a "bonus" arc scored *from* a
/// flagged state earns +10 on top of its lattice weight.
pub(crate) struct FlagScorer;

impl Scorer for FlagScorer {
    type State = bool;

    fn score(
        &self,
        state: Option<&Self::State>,
        arc: &Arc,
    ) -> Result<(Option<Self::State>, f64), ScoreError> {
        let flagged = matches!(state, Some(true));
        let bonus = if flagged && arc.label == "bonus" {
            10.0
        } else {
            0.0
        };
        Ok((Some(arc.label == "flag"), arc.weight + bonus))
    }
}
