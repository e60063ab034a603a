use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::seed::mock_saved_cards;
use crate::backend::storage::traits::CardStorage;
use shared::SavedCard;

/// Saved cards kept in memory for the session
#[derive(Clone, Default)]
pub struct InMemoryCardRepository {
    cards: Arc<Mutex<Vec<SavedCard>>>,
}

impl InMemoryCardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<SavedCard>) -> Self {
        Self {
            cards: Arc::new(Mutex::new(cards)),
        }
    }

    /// Repository pre-filled with the dashboard's mock cards
    pub fn seeded() -> Self {
        Self::with_cards(mock_saved_cards())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<SavedCard>>> {
        self.cards
            .lock()
            .map_err(|_| anyhow::anyhow!("Card repository lock poisoned"))
    }
}

impl CardStorage for InMemoryCardRepository {
    fn list_cards(&self) -> Result<Vec<SavedCard>> {
        Ok(self.lock()?.clone())
    }

    fn store_card(&self, card: &SavedCard) -> Result<()> {
        let mut cards = self.lock()?;
        if cards.iter().any(|c| c.id == card.id) {
            return Err(anyhow::anyhow!("Card already exists: {}", card.id));
        }
        debug!("Storing card {}", card.id);
        cards.push(card.clone());
        Ok(())
    }

    fn update_card(&self, card: &SavedCard) -> Result<()> {
        let mut cards = self.lock()?;
        let existing = cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or_else(|| anyhow::anyhow!("Card not found: {}", card.id))?;
        *existing = card.clone();
        Ok(())
    }

    fn delete_card(&self, card_id: &str) -> Result<bool> {
        let mut cards = self.lock()?;
        let before = cards.len();
        cards.retain(|c| c.id != card_id);
        Ok(cards.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_delete() {
        let repo = InMemoryCardRepository::seeded();
        assert_eq!(repo.list_cards().unwrap().len(), 2);

        let mut card = mock_saved_cards().remove(0);
        assert!(repo.store_card(&card).is_err());

        card.id = "3".to_string();
        repo.store_card(&card).unwrap();
        assert_eq!(repo.list_cards().unwrap().last().unwrap().id, "3");

        assert!(repo.delete_card("3").unwrap());
        assert!(!repo.delete_card("3").unwrap());
    }

    #[test]
    fn test_update_card() {
        let repo = InMemoryCardRepository::seeded();
        let mut card = repo.list_cards().unwrap().remove(1);
        card.is_default = true;

        repo.update_card(&card).unwrap();
        assert!(repo.list_cards().unwrap()[1].is_default);

        card.id = "missing".to_string();
        assert!(repo.update_card(&card).is_err());
    }
}
