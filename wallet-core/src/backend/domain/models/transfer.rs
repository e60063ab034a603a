use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::backend::domain::recipient_service::RecipientError;
use shared::{Recipient, TransferReceipt, TransferStep};

/// Identity of a draft or form session. Deferred actions are keyed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Working state of one transfer attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    pub id: DraftId,
    pub step: TransferStep,
    pub recipient: Option<Recipient>,
    /// Minor currency units; only meaningful once `recipient` is set
    pub amount_cents: Option<u64>,
    pub note: Option<String>,
    /// Set exactly once, when the draft reaches `Complete`
    pub receipt: Option<TransferReceipt>,
}

impl TransferDraft {
    pub fn new() -> Self {
        Self {
            id: DraftId::new(),
            step: TransferStep::SelectRecipient,
            recipient: None,
            amount_cents: None,
            note: None,
            receipt: None,
        }
    }

    /// Drop everything entered after the recipient picker
    pub(crate) fn reset_amount_and_note(&mut self) {
        self.amount_cents = None;
        self.note = None;
    }
}

impl Default for TransferDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a wizard transition did not happen. The draft is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("{operation} is not available in step '{step}'")]
    InvalidStep {
        operation: &'static str,
        step: TransferStep,
    },
    #[error("The transfer has been cancelled")]
    Disposed,
    #[error("Recipient not found: {0}")]
    UnknownRecipient(String),
    #[error(transparent)]
    InvalidRecipient(#[from] RecipientError),
    #[error("No recipient selected")]
    RecipientMissing,
    #[error("Please enter an amount")]
    AmountMissing,
    #[error("Amount must be greater than 0")]
    AmountNotPositive,
    #[error("Note is too long ({length} characters). Maximum is {max}.")]
    NoteTooLong { length: usize, max: usize },
}
