/// Errors from saved-card operations
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Please fill in all card details correctly")]
    IncompleteForm,
    #[error("Card not found: {0}")]
    NotFound(String),
    #[error("This card has already been added")]
    AlreadyAdded,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
