use std::time::Duration;
use tracing::{debug, info};

use super::deferred::DeferredAction;
use super::error::SessionError;
use super::signals::{CloseReason, HostSignal, SignalReceiver, SignalSender};
use crate::backend::domain::card_input::{incomplete_form_warning, is_card_form_valid};
use crate::backend::domain::{CardError, CardFormService, DraftId, SavedCardService};
use shared::{CardFormState, SavedCard, WalletConfig};

/// Host-facing add-card sheet: keystroke formatting, a simulated processing
/// delay on submit and an auto-close once the card is saved
pub struct AddCardSession {
    id: DraftId,
    form: CardFormState,
    forms: CardFormService,
    cards: SavedCardService,
    signals: SignalSender,
    processing_delay: Duration,
    auto_close_delay: Duration,
    auto_close: Option<DeferredAction>,
    added: Option<SavedCard>,
    closed: bool,
}

impl AddCardSession {
    pub fn new(cards: SavedCardService, config: &WalletConfig) -> (Self, SignalReceiver) {
        let (signals, rx) = SignalSender::channel();
        let session = Self {
            id: DraftId::new(),
            form: CardFormService::create_form_state(),
            forms: CardFormService::new(),
            cards,
            signals,
            processing_delay: config.processing_delay(),
            auto_close_delay: config.auto_dismiss_delay(),
            auto_close: None,
            added: None,
            closed: false,
        };
        (session, rx)
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn form(&self) -> &CardFormState {
        &self.form
    }

    pub fn added_card(&self) -> Option<&SavedCard> {
        self.added.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_valid(&self) -> bool {
        is_card_form_valid(&self.form)
    }

    pub fn warning(&self) -> Option<String> {
        incomplete_form_warning(&self.form)
    }

    pub fn input_number(&mut self, input: &str) -> Result<&CardFormState, SessionError> {
        self.update(|forms, form| forms.apply_number_input(form, input))
    }

    pub fn input_expiry(&mut self, input: &str) -> Result<&CardFormState, SessionError> {
        self.update(|forms, form| forms.apply_expiry_input(form, input))
    }

    pub fn input_cvv(&mut self, input: &str) -> Result<&CardFormState, SessionError> {
        self.update(|forms, form| forms.apply_cvv_input(form, input))
    }

    pub fn input_name(&mut self, input: &str) -> Result<&CardFormState, SessionError> {
        self.update(|forms, form| forms.apply_name_input(form, input))
    }

    pub fn set_default(&mut self, is_default: bool) -> Result<&CardFormState, SessionError> {
        self.update(|forms, form| forms.set_default(form, is_default))
    }

    /// Save the card after the processing delay. The form is validated
    /// before waiting and cleared once the card is stored.
    pub async fn submit(&mut self) -> Result<SavedCard, SessionError> {
        self.ensure_open()?;
        if !self.is_valid() {
            return Err(CardError::IncompleteForm.into());
        }

        info!("Processing new card for session {}", self.id);
        tokio::time::sleep(self.processing_delay).await;

        let card = self.cards.add_card(&self.form)?;
        self.form = self.forms.clear_form();
        self.added = Some(card.clone());

        self.signals.send(HostSignal::CardAdded {
            session_id: self.id,
            card: card.clone(),
        });
        self.schedule_auto_close();

        Ok(card)
    }

    pub fn cancel(&mut self) {
        if let Some(action) = self.auto_close.take() {
            action.cancel();
        }
        if self.closed {
            return;
        }

        info!("Add card session {} cancelled", self.id);
        self.closed = true;
        self.signals.close_requested(self.id, CloseReason::Cancelled);
    }

    pub fn dispose(mut self) {
        debug!("Disposing add card session {}", self.id);
        if let Some(action) = self.auto_close.take() {
            action.cancel();
        }
        self.closed = true;
    }

    fn update<F>(&mut self, apply: F) -> Result<&CardFormState, SessionError>
    where
        F: FnOnce(&CardFormService, CardFormState) -> CardFormState,
    {
        self.ensure_open()?;
        let form = std::mem::take(&mut self.form);
        self.form = apply(&self.forms, form);
        Ok(&self.form)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed || self.added.is_some() {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    fn schedule_auto_close(&mut self) {
        let signals = self.signals.clone();
        let id = self.id;
        self.auto_close = Some(DeferredAction::schedule(id, self.auto_close_delay, move || {
            signals.close_requested(id, CloseReason::AutoDismiss);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::SequentialIdGenerator;
    use crate::backend::storage::{CardStorage, InMemoryCardRepository};
    use shared::CardNetwork;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn setup_test() -> (AddCardSession, SignalReceiver, InMemoryCardRepository) {
        let repository = InMemoryCardRepository::seeded();
        let cards = SavedCardService::new(Arc::new(repository.clone()), Arc::new(SequentialIdGenerator::new(2024)));
        let (session, rx) = AddCardSession::new(cards, &WalletConfig::default());
        (session, rx, repository)
    }

    fn fill_form(session: &mut AddCardSession) {
        session.input_number("5500 0000 0000 0004").unwrap();
        session.input_name("ada lovelace").unwrap();
        session.input_expiry("0128").unwrap();
        session.input_cvv("321").unwrap();
    }

    #[test]
    fn test_keystrokes_update_form() {
        let (mut session, _rx, _) = setup_test();

        let form = session.input_number("4111111").unwrap();
        assert_eq!(form.formatted_number, "4111 111");
        assert_eq!(form.network, CardNetwork::Visa);
        assert!(session.warning().is_some());

        fill_form(&mut session);
        assert!(session.is_valid());
        assert_eq!(session.form().expiry, "01/28");
        assert_eq!(session.form().name, "ADA LOVELACE");
        assert_eq!(session.warning(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_saves_card_and_auto_closes() {
        let (mut session, mut rx, repository) = setup_test();
        fill_form(&mut session);

        let started = Instant::now();
        let card = session.submit().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(card.network, CardNetwork::Mastercard);
        assert_eq!(repository.list_cards().unwrap().last(), Some(&card));
        assert_eq!(session.form(), &CardFormState::default());
        assert_eq!(session.added_card(), Some(&card));

        assert_eq!(
            rx.recv().await,
            Some(HostSignal::CardAdded {
                session_id: session.id(),
                card: card.clone(),
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(HostSignal::CloseRequested {
                session_id: session.id(),
                reason: CloseReason::AutoDismiss,
            })
        );
        assert!(matches!(session.input_cvv("1"), Err(SessionError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_rejected_without_delay() {
        let (mut session, mut rx, repository) = setup_test();
        session.input_number("5500").unwrap();

        let result = session.submit().await;

        assert!(matches!(result, Err(SessionError::Card(CardError::IncompleteForm))));
        assert_eq!(repository.list_cards().unwrap().len(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_submit_suppresses_auto_close() {
        let (mut session, mut rx, _) = setup_test();
        fill_form(&mut session);
        session.submit().await.unwrap();

        session.cancel();

        assert!(matches!(rx.recv().await, Some(HostSignal::CardAdded { .. })));
        assert!(matches!(
            rx.recv().await,
            Some(HostSignal::CloseRequested { reason: CloseReason::Cancelled, .. })
        ));
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert!(rx.try_recv().is_err());
        assert!(session.is_closed());
    }
}
