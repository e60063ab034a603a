//! In-memory storage backed by mock data

pub mod card_repository;
pub mod recipient_directory;
pub mod seed;

pub use card_repository::InMemoryCardRepository;
pub use recipient_directory::InMemoryRecipientDirectory;
