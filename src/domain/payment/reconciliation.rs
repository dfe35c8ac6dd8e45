//! Callback reconciliation state machine.

use crate::domain::foundation::StateMachine;

/// Progress of a single provider callback through reconciliation.
///
/// A callback is `Pending` until the provider confirms it is authentic and
/// it names a transaction, at which point it is `Recorded`. It ends
/// `Settled` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationState {
    Pending,
    Recorded,
    Settled,
    Rejected,
}

impl StateMachine for ReconciliationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ReconciliationState::*;
        matches!(
            (self, target),
            (Pending, Recorded) | (Pending, Rejected) | (Recorded, Settled) | (Recorded, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReconciliationState::*;
        match self {
            Pending => vec![Recorded, Rejected],
            Recorded => vec![Settled, Rejected],
            Settled | Rejected => vec![],
        }
    }
}
