use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::card_input::is_card_form_valid;
use crate::backend::domain::identifiers::IdGenerator;
use crate::backend::domain::models::CardError;
use crate::backend::storage::CardStorage;
use shared::{CardFormState, SavedCard};

const ADDED_DATE_FORMAT: &str = "%b %-d, %Y";

/// Service for the wallet's saved cards
#[derive(Clone)]
pub struct SavedCardService {
    storage: Arc<dyn CardStorage>,
    ids: Arc<dyn IdGenerator>,
}

impl SavedCardService {
    pub fn new(storage: Arc<dyn CardStorage>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { storage, ids }
    }

    pub fn list_cards(&self) -> Result<Vec<SavedCard>, CardError> {
        Ok(self.storage.list_cards()?)
    }

    pub fn default_card(&self) -> Result<Option<SavedCard>, CardError> {
        Ok(self.storage.list_cards()?.into_iter().find(|c| c.is_default))
    }

    /// Save a completed add-card form, dated today
    pub fn add_card(&self, form: &CardFormState) -> Result<SavedCard, CardError> {
        self.add_card_on(form, Local::now().date_naive())
    }

    /// Save a completed add-card form with an explicit added date
    pub fn add_card_on(&self, form: &CardFormState, added_on: NaiveDate) -> Result<SavedCard, CardError> {
        if !is_card_form_valid(form) {
            warn!("Rejected incomplete card form");
            return Err(CardError::IncompleteForm);
        }

        let existing = self.storage.list_cards()?;
        if existing.iter().any(|c| c.number == form.raw_digits) {
            return Err(CardError::AlreadyAdded);
        }

        let card = SavedCard {
            id: self.ids.card_id(),
            number: form.raw_digits.clone(),
            name: form.name.clone(),
            expiry: form.expiry.clone(),
            network: form.network,
            is_default: form.is_default || existing.is_empty(),
            added_date: added_on.format(ADDED_DATE_FORMAT).to_string(),
        };

        self.storage.store_card(&card)?;
        if card.is_default {
            self.clear_default_except(&existing, &card.id)?;
        }

        info!(
            "Added {} card ending in {} with ID: {}",
            card.network,
            card.last_four(),
            card.id
        );
        Ok(card)
    }

    /// Delete a card. Returns false when no card has this ID.
    ///
    /// Removing the default card leaves the wallet without one until the
    /// user picks another.
    pub fn delete_card(&self, card_id: &str) -> Result<bool, CardError> {
        let deleted = self.storage.delete_card(card_id)?;
        if deleted {
            info!("Deleted card {}", card_id);
        } else {
            warn!("Card not found for deletion: {}", card_id);
        }
        Ok(deleted)
    }

    /// Make `card_id` the only default card
    pub fn set_default(&self, card_id: &str) -> Result<SavedCard, CardError> {
        let cards = self.storage.list_cards()?;
        let mut card = cards
            .iter()
            .find(|c| c.id == card_id)
            .cloned()
            .ok_or_else(|| CardError::NotFound(card_id.to_string()))?;

        self.clear_default_except(&cards, card_id)?;
        if !card.is_default {
            card.is_default = true;
            self.storage.update_card(&card)?;
        }

        info!("Card {} is now the default", card_id);
        Ok(card)
    }

    fn clear_default_except(&self, cards: &[SavedCard], keep_id: &str) -> Result<(), CardError> {
        for other in cards.iter().filter(|c| c.is_default && c.id != keep_id) {
            let mut other = other.clone();
            other.is_default = false;
            self.storage.update_card(&other)?;
        }
        Ok(())
    }
}
