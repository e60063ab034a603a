use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::backend::domain::DraftId;
use shared::{SavedCard, TransferReceipt};

/// Why a session asks the host to close its sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    AutoDismiss,
    Cancelled,
}

/// Notifications sent from a session to the host UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostSignal {
    TransferCompleted {
        draft_id: DraftId,
        receipt: TransferReceipt,
    },
    CardAdded {
        session_id: DraftId,
        card: SavedCard,
    },
    CloseRequested {
        session_id: DraftId,
        reason: CloseReason,
    },
}

pub type SignalReceiver = UnboundedReceiver<HostSignal>;

/// Sending half shared by a session and its deferred actions
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: UnboundedSender<HostSignal>,
}

impl SignalSender {
    pub fn channel() -> (Self, SignalReceiver) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Send a signal. A host that stopped listening is not an error.
    pub fn send(&self, signal: HostSignal) {
        if self.tx.send(signal).is_err() {
            debug!("Host signal dropped: receiver closed");
        }
    }

    pub fn close_requested(&self, session_id: DraftId, reason: CloseReason) {
        self.send(HostSignal::CloseRequested { session_id, reason });
    }
}
