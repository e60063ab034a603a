//! # Storage Module
//!
//! Holds the collaborators the domain layer reads from and appends to: the
//! recipient directory and the saved-card store.
//!
//! The domain only depends on the traits in [`traits`]. The in-memory
//! implementations in [`memory`] back the demo dashboard and the tests; a real
//! deployment would swap in persistent implementations without touching the
//! domain services.

pub mod memory;
pub mod traits;

pub use memory::{InMemoryCardRepository, InMemoryRecipientDirectory};
pub use traits::{CardStorage, RecipientDirectory};
