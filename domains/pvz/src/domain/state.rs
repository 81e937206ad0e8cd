//! Reception lifecycle state machine
//!
//! A reception is opened in progress, accepts and gives back products while
//! in progress, and is closed exactly once. Closed is terminal: a closed
//! reception is never reopened and its products never change.

pub use pickup_common::StateError;

// ============================================================================
// Reception State Machine
// ============================================================================

/// Reception lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceptionState {
    InProgress,
    Closed,
}

impl ReceptionState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ReceptionState] {
        match self {
            Self::InProgress => &[Self::InProgress, Self::Closed],
            Self::Closed => &[],
        }
    }
}

impl std::fmt::Display for ReceptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Events that act on a reception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceptionEvent {
    /// A product is recorded against the reception
    AddProduct,
    /// The most recently added product is removed
    RemoveLastProduct,
    /// The reception is closed by an employee
    Close,
}

impl std::fmt::Display for ReceptionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddProduct => write!(f, "add_product"),
            Self::RemoveLastProduct => write!(f, "remove_last_product"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// Reception state machine
pub struct ReceptionStateMachine;

impl ReceptionStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error otherwise.
    pub fn transition(
        current: ReceptionState,
        event: ReceptionEvent,
    ) -> Result<ReceptionState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (ReceptionState::InProgress, ReceptionEvent::AddProduct)
            | (ReceptionState::InProgress, ReceptionEvent::RemoveLastProduct) => {
                ReceptionState::InProgress
            }
            (ReceptionState::InProgress, ReceptionEvent::Close) => ReceptionState::Closed,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ReceptionState, event: ReceptionEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
