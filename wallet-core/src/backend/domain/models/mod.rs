pub mod card;
pub mod transfer;

pub use card::CardError;
pub use transfer::{DraftId, TransferDraft, TransitionError};
