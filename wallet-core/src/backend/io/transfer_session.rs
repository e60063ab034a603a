//! Host-facing wrapper around a [`TransferWizard`].
//!
//! Adds the simulated processing delay before a transfer completes and the
//! auto-dismiss timer afterwards. Both are tokio timers owned by the session:
//! dropping a pending `submit` future leaves the draft untouched, and
//! cancelling or dropping the session aborts the auto-dismiss.

use std::time::Duration;
use tracing::{debug, info};

use super::deferred::DeferredAction;
use super::error::SessionError;
use super::signals::{CloseReason, HostSignal, SignalReceiver, SignalSender};
use crate::backend::domain::{DraftId, TransferDraft, TransferWizard};
use shared::{AddRecipientRequest, AmountValidation, Recipient, RecipientGroups, TransferReceipt, TransferStep, WalletConfig};

pub struct TransferSession {
    wizard: TransferWizard,
    signals: SignalSender,
    processing_delay: Duration,
    auto_dismiss_delay: Duration,
    auto_dismiss: Option<DeferredAction>,
}

impl TransferSession {
    pub fn new(wizard: TransferWizard, config: &WalletConfig) -> (Self, SignalReceiver) {
        let (signals, rx) = SignalSender::channel();
        let session = Self {
            wizard,
            signals,
            processing_delay: config.processing_delay(),
            auto_dismiss_delay: config.auto_dismiss_delay(),
            auto_dismiss: None,
        };
        (session, rx)
    }

    pub fn id(&self) -> DraftId {
        self.wizard.id()
    }

    pub fn draft(&self) -> &TransferDraft {
        self.wizard.draft()
    }

    pub fn step(&self) -> TransferStep {
        self.wizard.step()
    }

    pub fn progress_percent(&self) -> u8 {
        self.wizard.progress_percent()
    }

    pub fn wizard(&self) -> &TransferWizard {
        &self.wizard
    }

    pub fn has_pending_dismiss(&self) -> bool {
        self.auto_dismiss.as_ref().is_some_and(|action| !action.is_finished())
    }

    pub fn search_recipients(&self, query: &str) -> Result<RecipientGroups, SessionError> {
        Ok(self.wizard.search_recipients(query)?)
    }

    pub fn select_recipient(&mut self, recipient_id: &str) -> Result<(), SessionError> {
        Ok(self.wizard.select_recipient(recipient_id)?)
    }

    pub fn add_recipient(&mut self, request: AddRecipientRequest) -> Result<Recipient, SessionError> {
        Ok(self.wizard.add_recipient(request)?)
    }

    pub fn set_amount(&mut self, amount_cents: u64) -> Result<(), SessionError> {
        Ok(self.wizard.set_amount(amount_cents)?)
    }

    pub fn set_amount_input(&mut self, amount_input: &str) -> Result<AmountValidation, SessionError> {
        Ok(self.wizard.set_amount_input(amount_input)?)
    }

    pub fn clear_amount(&mut self) -> Result<(), SessionError> {
        Ok(self.wizard.clear_amount()?)
    }

    pub fn set_note(&mut self, note: &str) -> Result<(), SessionError> {
        Ok(self.wizard.set_note(note)?)
    }

    pub fn confirm_amount(&mut self) -> Result<(), SessionError> {
        Ok(self.wizard.confirm_amount()?)
    }

    pub fn back(&mut self) -> Result<TransferStep, SessionError> {
        Ok(self.wizard.back()?)
    }

    /// Send the money after the processing delay.
    ///
    /// Guards are checked before waiting. On success the host receives
    /// `TransferCompleted` and, after the auto-dismiss delay, a
    /// `CloseRequested` with [`CloseReason::AutoDismiss`].
    pub async fn submit(&mut self) -> Result<TransferReceipt, SessionError> {
        self.wizard.check_submit()?;

        info!("Processing transfer {}", self.wizard.id());
        tokio::time::sleep(self.processing_delay).await;

        let receipt = self.wizard.submit()?;
        self.signals.send(HostSignal::TransferCompleted {
            draft_id: self.wizard.id(),
            receipt: receipt.clone(),
        });
        self.schedule_auto_dismiss();

        Ok(receipt)
    }

    /// Close the sheet: abort any pending auto-dismiss and dispose the draft
    pub fn cancel(&mut self) {
        if let Some(action) = self.auto_dismiss.take() {
            action.cancel();
        }
        if self.wizard.is_disposed() {
            return;
        }

        self.wizard.cancel();
        self.signals.close_requested(self.wizard.id(), CloseReason::Cancelled);
    }

    /// Tear the session down without notifying the host
    pub fn dispose(mut self) {
        debug!("Disposing transfer session {}", self.wizard.id());
        if let Some(action) = self.auto_dismiss.take() {
            action.cancel();
        }
        self.wizard.cancel();
    }

    fn schedule_auto_dismiss(&mut self) {
        let signals = self.signals.clone();
        let id = self.wizard.id();
        self.auto_dismiss = Some(DeferredAction::schedule(id, self.auto_dismiss_delay, move || {
            info!("Auto-dismissing transfer {}", id);
            signals.close_requested(id, CloseReason::AutoDismiss);
        }));
    }
}
