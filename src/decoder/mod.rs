mod beam;
mod hypothesis;
#[cfg(test)]
pub(crate) mod testutil;
mod walk;

pub use beam::beam_search;
pub use walk::walk;

use crate::lattice::NodeId;
use crate::scorer::ScoreError;

/// Errors a decode pass can report for one sentence.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The graph never saw a final-state marker; decoding cannot tell
    /// where the output should end.
    #[error("final state was never set")]
    FinalStateUnset,

    /// No hypothesis reached the final state (exact walk) or no terminal
    /// hypothesis survived (beam search).
    #[error("no path from the start node to final state {final_state}")]
    NoPathFound { final_state: NodeId },

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoreError),
}

/// Winning path of a decode pass.
///
/// `score` follows the comparison policy of the pass that produced it: raw
/// cumulative score, or length-normalized when the exact walk ran with
/// `normalize` set.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    pub score: f64,
    /// Cumulative word count of the winning path (epsilon labels included).
    pub path_len: usize,
    /// Detokenized output: delimiter-joined labels flattened to words,
    /// `<eps>` removed.
    pub text: String,
}
