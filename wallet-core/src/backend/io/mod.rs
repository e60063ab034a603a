//! # IO Layer
//!
//! Host-facing sessions. A session owns one wizard or card form, adds the
//! simulated processing delay and the auto-dismiss timer, and reports to the
//! host through [`HostSignal`]s on an unbounded tokio channel.

pub mod card_session;
pub mod deferred;
pub mod error;
pub mod signals;
pub mod transfer_session;

pub use card_session::AddCardSession;
pub use deferred::DeferredAction;
pub use error::SessionError;
pub use signals::{CloseReason, HostSignal, SignalReceiver, SignalSender};
pub use transfer_session::TransferSession;
