//! # Backend Module
//!
//! Contains all non-UI logic of the wallet: the send-money wizard, card
//! entry, saved cards and top-ups.
//!
//! ## Architecture
//!
//! ```text
//! Host UI
//!     ↓
//! IO Layer (sessions, timers, host signals)
//!     ↓
//! Domain Layer (wizard, services, validation)
//!     ↓
//! Storage Layer (recipient directory, saved cards)
//! ```
//!
//! The backend owns the directory and card storage for the lifetime of the
//! process and hands out one session per open sheet.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::backend::domain::{
    IdGenerator, MoneyService, RandomIdGenerator, RecipientService, SavedCardService, TopUpService,
    TransferWizard,
};
use crate::backend::io::{AddCardSession, SignalReceiver, TransferSession};
use crate::backend::storage::{InMemoryCardRepository, InMemoryRecipientDirectory};
use shared::WalletConfig;

/// Shared services of the running wallet
#[derive(Clone)]
pub struct WalletBackend {
    config: WalletConfig,
    recipients: RecipientService,
    cards: SavedCardService,
    top_up: TopUpService,
    ids: Arc<dyn IdGenerator>,
}

/// Initialize the backend with random identifiers and the seeded mock data
pub fn initialize_backend(config: WalletConfig) -> Result<WalletBackend> {
    initialize_backend_with(config, Arc::new(RandomIdGenerator::new()))
}

/// Initialize the backend with a caller-provided identifier source
pub fn initialize_backend_with(config: WalletConfig, ids: Arc<dyn IdGenerator>) -> Result<WalletBackend> {
    if config.min_amount_cents > config.max_amount_cents {
        anyhow::bail!(
            "Invalid wallet config: min_amount_cents {} exceeds max_amount_cents {}",
            config.min_amount_cents,
            config.max_amount_cents
        );
    }

    info!("Setting up storage");
    let directory = Arc::new(InMemoryRecipientDirectory::seeded());
    let card_repository = Arc::new(InMemoryCardRepository::seeded());

    info!("Setting up domain services");
    let recipients = RecipientService::new(directory, ids.clone());
    let cards = SavedCardService::new(card_repository, ids.clone());
    let top_up = TopUpService::new(MoneyService::with_config(config.clone()), ids.clone());

    Ok(WalletBackend {
        config,
        recipients,
        cards,
        top_up,
        ids,
    })
}

impl WalletBackend {
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn recipient_service(&self) -> &RecipientService {
        &self.recipients
    }

    pub fn card_service(&self) -> &SavedCardService {
        &self.cards
    }

    pub fn top_up_service(&self) -> &TopUpService {
        &self.top_up
    }

    /// Open the send-money sheet with a fresh draft
    pub fn start_transfer(&self) -> (TransferSession, SignalReceiver) {
        let wizard = TransferWizard::new(self.recipients.clone(), self.ids.clone(), &self.config);
        info!("Opened transfer session {}", wizard.id());
        TransferSession::new(wizard, &self.config)
    }

    /// Open the add-card sheet with an empty form
    pub fn start_add_card(&self) -> (AddCardSession, SignalReceiver) {
        let (session, rx) = AddCardSession::new(self.cards.clone(), &self.config);
        info!("Opened add card session {}", session.id());
        (session, rx)
    }
}
