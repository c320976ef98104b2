//! Reader for the text search-graph format (OpenFST-style lines as emitted
//! by a phrase-based decoder's output-search-graph mode).
//!
//! Each edge line carries `tail head source target [cost]`; the source
//! word is ignored here, and a missing cost means 0. A line holding a
//! single integer marks the final state. Costs in the file are raw
//! (lower = better) and are negated on the way in, because the decoders
//! treat higher score as better.

use std::io::{self, BufRead};

use tracing::debug;

use crate::lattice::{Graph, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {msg}")]
    Malformed { line: usize, msg: String },
}

fn malformed(line: usize, msg: impl Into<String>) -> LoadError {
    LoadError::Malformed {
        line,
        msg: msg.into(),
    }
}

/// Read one sentence's search graph.
///
/// The returned graph may still lack a final state if the input never
/// contained a final-state line; the decoders report that as
/// [`crate::decoder::DecodeError::FinalStateUnset`].
pub fn read_graph<R: BufRead>(reader: R, sent_no: usize) -> Result<Graph, LoadError> {
    let mut graph = Graph::new(sent_no);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            [] => continue,
            [final_state] => {
                let id: NodeId = final_state
                    .parse()
                    .map_err(|_| malformed(line_no, format!("invalid final state {final_state:?}")))?;
                graph.set_final_state(id);
            }
            [tail, head, _source, target, rest @ ..] if rest.len() <= 1 => {
                let tail: NodeId = tail
                    .parse()
                    .map_err(|_| malformed(line_no, format!("invalid tail id {tail:?}")))?;
                let head: NodeId = head
                    .parse()
                    .map_err(|_| malformed(line_no, format!("invalid head id {head:?}")))?;
                let cost: f64 = match rest.first() {
                    Some(cost) => cost
                        .parse()
                        .map_err(|_| malformed(line_no, format!("invalid cost {cost:?}")))?,
                    None => 0.0,
                };
                graph
                    .add_arc(tail, head, *target, -cost)
                    .map_err(|e| malformed(line_no, e.to_string()))?;
            }
            _ => {
                return Err(malformed(
                    line_no,
                    format!("expected 1, 4 or 5 fields, got {}", fields.len()),
                ));
            }
        }
    }

    debug!(
        sent_no,
        nodes = graph.num_nodes(),
        arcs = graph.num_arcs(),
        final_state = ?graph.final_state(),
        "graph loaded"
    );
    Ok(graph)
}
