//! Identifier generation for recipients, cards and receipts.
//!
//! Services never build identifiers themselves; they ask an injected
//! [`IdGenerator`]. Tests use [`SequentialIdGenerator`] for deterministic
//! output, the running application uses [`RandomIdGenerator`].

use chrono::{Datelike, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Source of identifiers. Every call returns a value not returned before
/// within the lifetime of the generator.
pub trait IdGenerator: Send + Sync {
    /// Directory identifier for a newly added recipient
    fn recipient_id(&self) -> String;

    /// "TXN-<year>-<suffix>"
    fn transfer_reference(&self) -> String;

    /// "CARD-<suffix>"
    fn card_id(&self) -> String;

    /// "ADD-<year>-<suffix>"
    fn top_up_reference(&self) -> String;
}

/// Counter based generator with a fixed year
#[derive(Debug)]
pub struct SequentialIdGenerator {
    year: i32,
    recipients: AtomicU64,
    transfers: AtomicU64,
    cards: AtomicU64,
    top_ups: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            recipients: AtomicU64::new(1),
            transfers: AtomicU64::new(1),
            cards: AtomicU64::new(1),
            top_ups: AtomicU64::new(1),
        }
    }

    fn next(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn recipient_id(&self) -> String {
        format!("recipient::{}", Self::next(&self.recipients))
    }

    fn transfer_reference(&self) -> String {
        format!("TXN-{}-{:03}", self.year, Self::next(&self.transfers))
    }

    fn card_id(&self) -> String {
        format!("CARD-{:06}", Self::next(&self.cards))
    }

    fn top_up_reference(&self) -> String {
        format!("ADD-{}-{:06}", self.year, Self::next(&self.top_ups))
    }
}

/// UUID based generator using the current year.
///
/// Short suffixes are drawn at random; every issued identifier is remembered
/// and a clash is drawn again.
#[derive(Debug, Default)]
pub struct RandomIdGenerator {
    issued: Mutex<HashSet<String>>,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Six upper-case hex characters taken from a fresh v4 UUID
    fn short_suffix() -> String {
        let simple = Uuid::new_v4().simple().to_string();
        simple[..6].to_uppercase()
    }

    fn unique<F>(&self, build: F) -> String
    where
        F: Fn() -> String,
    {
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let id = build();
            if issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

impl IdGenerator for RandomIdGenerator {
    fn recipient_id(&self) -> String {
        self.unique(|| format!("recipient::{}", Uuid::new_v4()))
    }

    fn transfer_reference(&self) -> String {
        self.unique(|| format!("TXN-{}-{}", Utc::now().year(), Self::short_suffix()))
    }

    fn card_id(&self) -> String {
        self.unique(|| format!("CARD-{}", Self::short_suffix()))
    }

    fn top_up_reference(&self) -> String {
        self.unique(|| format!("ADD-{}-{}", Utc::now().year(), Self::short_suffix()))
    }
}
