use thiserror::Error;

/// Errors raised by the matching and pricing core.
///
/// None of these abort a scan: alignment failures only prevent a merge, and
/// pricing failures drop the affected event from the ranking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArbError {
    #[error("sequence length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error(
        "fixture {fixture_id} from provider {provider_id} has {found} outcomes, event expects {expected}"
    )]
    OutcomeCountMismatch {
        expected: usize,
        found: usize,
        provider_id: u32,
        fixture_id: u32,
    },

    #[error("assignment network saturated {achieved} of {required} units of flow")]
    AssignmentInfeasible { required: usize, achieved: usize },

    #[error("event has no outcomes")]
    NoOutcomes,

    #[error("outcome order {order:?} is not a permutation")]
    NotAPermutation { order: Vec<usize> },
}
