//! # Domain Layer
//!
//! Business rules of the wallet flows, independent of timers and hosts.
//!
//! ## Key Components
//!
//! - **TransferWizard**: the multi-step send-money state machine
//! - **RecipientService**: directory search, grouping and new recipients
//! - **MoneyService**: amount parsing and formatting in integer cents
//! - **CardFormService**: per-keystroke card input formatting
//! - **SavedCardService**: the wallet's saved cards and default card
//! - **TopUpService**: simulated top-ups from a funding source
//!
//! Services receive their storage and [`identifiers::IdGenerator`] through
//! constructors; nothing here reads a clock for scheduling or spawns tasks.
//! The io layer wraps these services with delays and host signals.

pub mod card_input;
pub mod card_service;
pub mod identifiers;
pub mod models;
pub mod money;
pub mod recipient_service;
pub mod top_up;
pub mod transfer_wizard;

pub use card_input::CardFormService;
pub use card_service::SavedCardService;
pub use identifiers::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use models::{CardError, DraftId, TransferDraft, TransitionError};
pub use money::MoneyService;
pub use recipient_service::{RecipientError, RecipientService};
pub use top_up::{TopUpError, TopUpService};
pub use transfer_wizard::TransferWizard;
