//! # Storage Traits
//!
//! Storage abstractions used by the domain layer.

use anyhow::Result;
use shared::{Recipient, SavedCard};

/// Ordered collection of known recipients.
///
/// The transfer wizard only lists and appends; it never removes or edits
/// entries.
pub trait RecipientDirectory: Send + Sync {
    /// All recipients in insertion order
    fn list(&self) -> Result<Vec<Recipient>>;

    /// Append a recipient at the end of the directory
    fn append(&self, recipient: Recipient) -> Result<()>;
}

/// Trait defining the interface for saved card storage operations
pub trait CardStorage: Send + Sync {
    /// All saved cards in insertion order
    fn list_cards(&self) -> Result<Vec<SavedCard>>;

    /// Store a new card
    fn store_card(&self, card: &SavedCard) -> Result<()>;

    /// Replace an existing card with the same ID
    fn update_card(&self, card: &SavedCard) -> Result<()>;

    /// Delete a card
    /// Returns true if the card was found and deleted, false otherwise
    fn delete_card(&self, card_id: &str) -> Result<bool>;
}
