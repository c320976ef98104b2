use crate::lattice::Arc;

/// A scorer rejected an arc (for example, a label outside its vocabulary
/// when the implementation chooses not to substitute a fallback token).
#[derive(Debug, thiserror::Error)]
#[error("failed to score label {label:?}: {reason}")]
pub struct ScoreError {
    pub label: String,
    pub reason: String,
}

impl ScoreError {
    pub fn new(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

/// Incremental per-arc scoring capability.
///
/// The decoders treat `State` as opaque: they only thread the state
/// returned by one call into the next call along the same hypothesis
/// chain. A `None` input state means "score from the model's initial
/// condition". Implementations must be referentially transparent for a
/// given `(state, arc)` pair — calls for other hypotheses must not affect
/// the result.
///
/// A model-backed implementation typically splits a multi-word label into
/// per-token steps internally and accumulates their log-probabilities into
/// the single returned cost.
pub trait Scorer {
    type State;

    fn score(
        &self,
        state: Option<&Self::State>,
        arc: &Arc,
    ) -> Result<(Option<Self::State>, f64), ScoreError>;
}

/// Stateless scorer that replays the weights stored on the lattice itself.
pub struct IdentityScorer;

impl Scorer for IdentityScorer {
    type State = ();

    fn score(
        &self,
        _state: Option<&Self::State>,
        arc: &Arc,
    ) -> Result<(Option<Self::State>, f64), ScoreError> {
        Ok((None, arc.weight))
    }
}
