use crate::backend::domain::{CardError, TransitionError};

/// Errors returned by host-facing sessions
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("The session has been closed")]
    Closed,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Card(#[from] CardError),
}
