//! Transfer wizard state machine.
//!
//! ```text
//! SelectRecipient --select/add--> EnterAmount --confirm_amount--> Confirm --submit--> Complete
//!        ^                            |  ^                           |
//!        +-----------back-------------+  +-----------back------------+
//! ```
//!
//! Every transition is synchronous and either takes full effect or returns a
//! [`TransitionError`] leaving the draft exactly as it was. There is no error
//! step; the host decides how to surface a rejected transition. The wizard
//! never touches a balance.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::domain::identifiers::IdGenerator;
use crate::backend::domain::models::{DraftId, TransferDraft, TransitionError};
use crate::backend::domain::money::MoneyService;
use crate::backend::domain::recipient_service::RecipientService;
use shared::{
    AddRecipientRequest, AmountValidation, Recipient, RecipientGroups, TransferReceipt,
    TransferStep, WalletConfig,
};

pub struct TransferWizard {
    draft: TransferDraft,
    recipients: RecipientService,
    money: MoneyService,
    ids: Arc<dyn IdGenerator>,
    max_note_length: usize,
    disposed: bool,
}

impl TransferWizard {
    pub fn new(recipients: RecipientService, ids: Arc<dyn IdGenerator>, config: &WalletConfig) -> Self {
        let draft = TransferDraft::new();
        debug!("Starting transfer draft {}", draft.id);

        Self {
            draft,
            recipients,
            money: MoneyService::with_config(config.clone()),
            ids,
            max_note_length: config.max_note_length,
            disposed: false,
        }
    }

    pub fn draft(&self) -> &TransferDraft {
        &self.draft
    }

    pub fn id(&self) -> DraftId {
        self.draft.id
    }

    pub fn step(&self) -> TransferStep {
        self.draft.step
    }

    pub fn receipt(&self) -> Option<&TransferReceipt> {
        self.draft.receipt.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn progress_percent(&self) -> u8 {
        self.draft.step.progress_percent()
    }

    pub fn money(&self) -> &MoneyService {
        &self.money
    }

    /// Recipients matching `query` for the picker
    pub fn search_recipients(&self, query: &str) -> Result<RecipientGroups, TransitionError> {
        self.ensure_active()?;
        Ok(self.recipients.search(query)?)
    }

    /// Pick an existing recipient from the directory
    pub fn select_recipient(&mut self, recipient_id: &str) -> Result<(), TransitionError> {
        self.ensure_step(TransferStep::SelectRecipient, "Selecting a recipient")?;

        let recipient = self
            .recipients
            .find(recipient_id)?
            .ok_or_else(|| TransitionError::UnknownRecipient(recipient_id.to_string()))?;

        self.enter_amount_step(recipient);
        Ok(())
    }

    /// Create a recipient, append it to the directory and select it
    pub fn add_recipient(&mut self, request: AddRecipientRequest) -> Result<Recipient, TransitionError> {
        self.ensure_step(TransferStep::SelectRecipient, "Adding a recipient")?;

        let recipient = self.recipients.add_recipient(request)?;
        self.enter_amount_step(recipient.clone());
        Ok(recipient)
    }

    /// Store an amount in cents. Invalid values are stored too; the
    /// `confirm_amount` guard rejects them.
    pub fn set_amount(&mut self, amount_cents: u64) -> Result<(), TransitionError> {
        self.ensure_step(TransferStep::EnterAmount, "Entering an amount")?;
        self.draft.amount_cents = Some(amount_cents);
        Ok(())
    }

    pub fn clear_amount(&mut self) -> Result<(), TransitionError> {
        self.ensure_step(TransferStep::EnterAmount, "Entering an amount")?;
        self.draft.amount_cents = None;
        Ok(())
    }

    /// Parse the amount text field. Anything that does not validate leaves the
    /// amount unset; the returned validation tells the host why.
    pub fn set_amount_input(&mut self, amount_input: &str) -> Result<AmountValidation, TransitionError> {
        self.ensure_step(TransferStep::EnterAmount, "Entering an amount")?;

        let validation = self.money.validate_amount_input(amount_input);
        self.draft.amount_cents = validation.amount_cents;
        Ok(validation)
    }

    pub fn set_note(&mut self, note: &str) -> Result<(), TransitionError> {
        self.ensure_step(TransferStep::EnterAmount, "Adding a note")?;

        let length = note.chars().count();
        if length > self.max_note_length {
            return Err(TransitionError::NoteTooLong {
                length,
                max: self.max_note_length,
            });
        }

        let trimmed = note.trim();
        self.draft.note = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Ok(())
    }

    /// Continue to the confirmation step once a positive amount is set
    pub fn confirm_amount(&mut self) -> Result<(), TransitionError> {
        self.ensure_step(TransferStep::EnterAmount, "Confirming the amount")?;
        Self::check_amount(self.draft.amount_cents)?;

        self.draft.step = TransferStep::Confirm;
        info!("Transfer {} ready for confirmation", self.draft.id);
        Ok(())
    }

    /// Go back one step. Leaving the amount step forgets the recipient.
    pub fn back(&mut self) -> Result<TransferStep, TransitionError> {
        self.ensure_active()?;

        match self.draft.step {
            TransferStep::EnterAmount => {
                self.draft.recipient = None;
                self.draft.reset_amount_and_note();
                self.draft.step = TransferStep::SelectRecipient;
            }
            TransferStep::Confirm => {
                self.draft.step = TransferStep::EnterAmount;
            }
            step => {
                return Err(TransitionError::InvalidStep {
                    operation: "Going back",
                    step,
                })
            }
        }

        debug!("Transfer {} moved back to {}", self.draft.id, self.draft.step);
        Ok(self.draft.step)
    }

    /// Run the `submit` guards without changing anything
    pub fn check_submit(&self) -> Result<(), TransitionError> {
        self.ensure_step(TransferStep::Confirm, "Sending money")?;
        if self.draft.recipient.is_none() {
            return Err(TransitionError::RecipientMissing);
        }
        Self::check_amount(self.draft.amount_cents)
    }

    /// Complete the transfer and produce its receipt.
    ///
    /// Only succeeds once per draft: on a completed draft this is a no-op that
    /// reports `InvalidStep`.
    pub fn submit(&mut self) -> Result<TransferReceipt, TransitionError> {
        self.check_submit()?;

        let (recipient, amount_cents) = match (&self.draft.recipient, self.draft.amount_cents) {
            (Some(recipient), Some(amount)) => (recipient.clone(), amount),
            (None, _) => return Err(TransitionError::RecipientMissing),
            (_, None) => return Err(TransitionError::AmountMissing),
        };

        let receipt = TransferReceipt {
            reference_id: self.ids.transfer_reference(),
            recipient,
            amount_cents,
            note: self.draft.note.clone(),
        };

        self.draft.receipt = Some(receipt.clone());
        self.draft.step = TransferStep::Complete;

        info!(
            "Transfer {} complete: {} sent to {} (reference {})",
            self.draft.id,
            self.money.format_cents(receipt.amount_cents),
            receipt.recipient.display_name,
            receipt.reference_id
        );
        Ok(receipt)
    }

    /// Abandon the draft. Every later operation is rejected.
    pub fn cancel(&mut self) {
        if !self.disposed {
            info!("Transfer {} cancelled in step {}", self.draft.id, self.draft.step);
            self.disposed = true;
        }
    }

    fn enter_amount_step(&mut self, recipient: Recipient) {
        info!("Transfer {} recipient: {}", self.draft.id, recipient.display_name);
        self.draft.recipient = Some(recipient);
        self.draft.reset_amount_and_note();
        self.draft.step = TransferStep::EnterAmount;
    }

    fn check_amount(amount_cents: Option<u64>) -> Result<(), TransitionError> {
        match amount_cents {
            None => Err(TransitionError::AmountMissing),
            Some(0) => Err(TransitionError::AmountNotPositive),
            Some(_) => Ok(()),
        }
    }

    fn ensure_active(&self) -> Result<(), TransitionError> {
        if self.disposed {
            return Err(TransitionError::Disposed);
        }
        Ok(())
    }

    fn ensure_step(&self, expected: TransferStep, operation: &'static str) -> Result<(), TransitionError> {
        self.ensure_active()?;
        if self.draft.step != expected {
            warn!("{} rejected for transfer {} in step {}", operation, self.draft.id, self.draft.step);
            return Err(TransitionError::InvalidStep {
                operation,
                step: self.draft.step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::identifiers::SequentialIdGenerator;
    use crate::backend::storage::{InMemoryRecipientDirectory, RecipientDirectory};

    fn setup_test() -> (TransferWizard, InMemoryRecipientDirectory) {
        let directory = InMemoryRecipientDirectory::seeded();
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIdGenerator::new(2024));
        let recipients = RecipientService::new(Arc::new(directory.clone()), ids.clone());
        let wizard = TransferWizard::new(recipients, ids, &WalletConfig::default());
        (wizard, directory)
    }

    fn wizard_at_confirm() -> TransferWizard {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();
        wizard.set_amount(2500).unwrap();
        wizard.confirm_amount().unwrap();
        wizard
    }

    #[test]
    fn test_initial_state() {
        let (wizard, _) = setup_test();

        assert_eq!(wizard.step(), TransferStep::SelectRecipient);
        assert!(wizard.draft().recipient.is_none());
        assert!(wizard.draft().amount_cents.is_none());
        assert!(wizard.receipt().is_none());
        assert_eq!(wizard.progress_percent(), 33);
    }

    #[test]
    fn test_select_recipient() {
        let (mut wizard, _) = setup_test();

        wizard.select_recipient("2").unwrap();

        assert_eq!(wizard.step(), TransferStep::EnterAmount);
        assert_eq!(wizard.draft().recipient.as_ref().unwrap().display_name, "Mike Chen");
    }

    #[test]
    fn test_select_unknown_recipient_is_rejected() {
        let (mut wizard, _) = setup_test();

        let result = wizard.select_recipient("missing");

        assert!(matches!(result, Err(TransitionError::UnknownRecipient(id)) if id == "missing"));
        assert_eq!(wizard.step(), TransferStep::SelectRecipient);
    }

    #[test]
    fn test_zero_amount_does_not_confirm() {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();

        wizard.set_amount(0).unwrap();
        assert_eq!(wizard.draft().amount_cents, Some(0));
        assert!(matches!(wizard.confirm_amount(), Err(TransitionError::AmountNotPositive)));
        assert_eq!(wizard.step(), TransferStep::EnterAmount);

        wizard.set_amount(2500).unwrap();
        wizard.confirm_amount().unwrap();
        assert_eq!(wizard.step(), TransferStep::Confirm);
    }

    #[test]
    fn test_missing_amount_does_not_confirm() {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();

        assert!(matches!(wizard.confirm_amount(), Err(TransitionError::AmountMissing)));
    }

    #[test]
    fn test_amount_input_parsing() {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();

        let validation = wizard.set_amount_input("$25.50").unwrap();
        assert!(validation.is_valid);
        assert_eq!(wizard.draft().amount_cents, Some(2550));

        let validation = wizard.set_amount_input("abc").unwrap();
        assert!(!validation.is_valid);
        assert_eq!(wizard.draft().amount_cents, None);
        assert!(wizard.confirm_amount().is_err());

        let validation = wizard.set_amount_input("-4").unwrap();
        assert!(!validation.is_valid);
        assert!(wizard.confirm_amount().is_err());
    }

    #[test]
    fn test_amount_rejected_outside_enter_amount() {
        let (mut wizard, _) = setup_test();

        let result = wizard.set_amount(100);

        assert!(matches!(
            result,
            Err(TransitionError::InvalidStep { step: TransferStep::SelectRecipient, .. })
        ));
        assert!(wizard.draft().amount_cents.is_none());
    }

    #[test]
    fn test_note_handling() {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();

        wizard.set_note("  Dinner  ").unwrap();
        assert_eq!(wizard.draft().note.as_deref(), Some("Dinner"));

        wizard.set_note("").unwrap();
        assert_eq!(wizard.draft().note, None);

        let long_note = "x".repeat(257);
        assert!(matches!(
            wizard.set_note(&long_note),
            Err(TransitionError::NoteTooLong { length: 257, max: 256 })
        ));
    }

    #[test]
    fn test_back_from_enter_amount_clears_recipient() {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();
        wizard.set_amount(2500).unwrap();
        wizard.set_note("Lunch").unwrap();
        let first_visit = wizard.draft().clone();

        assert_eq!(wizard.back().unwrap(), TransferStep::SelectRecipient);
        assert!(wizard.draft().recipient.is_none());

        wizard.select_recipient("1").unwrap();
        assert_eq!(wizard.step(), TransferStep::EnterAmount);
        assert_eq!(wizard.draft().recipient, first_visit.recipient);
        assert_eq!(wizard.draft().amount_cents, None);
        assert_eq!(wizard.draft().note, None);
    }

    #[test]
    fn test_back_from_confirm_keeps_amount() {
        let mut wizard = wizard_at_confirm();

        assert_eq!(wizard.back().unwrap(), TransferStep::EnterAmount);
        assert_eq!(wizard.draft().amount_cents, Some(2500));
        assert!(wizard.draft().recipient.is_some());
    }

    #[test]
    fn test_back_rejected_on_first_step() {
        let (mut wizard, _) = setup_test();

        assert!(matches!(wizard.back(), Err(TransitionError::InvalidStep { .. })));
    }

    #[test]
    fn test_add_recipient_selects_and_appends() {
        let (mut wizard, directory) = setup_test();

        let request = AddRecipientRequest {
            name: "Ann".to_string(),
            username: String::new(),
            phone: "555".to_string(),
            email: String::new(),
        };
        let recipient = wizard.add_recipient(request).unwrap();

        assert_eq!(recipient.handle, "@ann");
        assert_eq!(wizard.step(), TransferStep::EnterAmount);
        assert_eq!(wizard.draft().recipient.as_ref(), Some(&recipient));
        assert_eq!(directory.list().unwrap().last(), Some(&recipient));
    }

    #[test]
    fn test_add_recipient_guard_keeps_step() {
        let (mut wizard, directory) = setup_test();

        let request = AddRecipientRequest {
            name: "Ann".to_string(),
            ..AddRecipientRequest::default()
        };

        assert!(matches!(wizard.add_recipient(request), Err(TransitionError::InvalidRecipient(_))));
        assert_eq!(wizard.step(), TransferStep::SelectRecipient);
        assert_eq!(directory.list().unwrap().len(), 3);
    }

    #[test]
    fn test_submit_produces_single_receipt() {
        let mut wizard = wizard_at_confirm();

        let receipt = wizard.submit().unwrap();
        assert_eq!(receipt.reference_id, "TXN-2024-001");
        assert_eq!(receipt.amount_cents, 2500);
        assert_eq!(receipt.recipient.id, "1");
        assert_eq!(wizard.step(), TransferStep::Complete);
        assert_eq!(wizard.progress_percent(), 100);

        let second = wizard.submit();
        assert!(matches!(
            second,
            Err(TransitionError::InvalidStep { step: TransferStep::Complete, .. })
        ));
        assert_eq!(wizard.receipt(), Some(&receipt));
    }

    #[test]
    fn test_receipt_references_are_unique_per_transfer() {
        let directory = InMemoryRecipientDirectory::seeded();
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIdGenerator::new(2024));
        let recipients = RecipientService::new(Arc::new(directory), ids.clone());

        let mut references = Vec::new();
        for _ in 0..2 {
            let mut wizard = TransferWizard::new(recipients.clone(), ids.clone(), &WalletConfig::default());
            wizard.select_recipient("3").unwrap();
            wizard.set_amount(100).unwrap();
            wizard.confirm_amount().unwrap();
            references.push(wizard.submit().unwrap().reference_id);
        }

        assert_eq!(references, vec!["TXN-2024-001", "TXN-2024-002"]);
    }

    #[test]
    fn test_completed_draft_is_immutable() {
        let mut wizard = wizard_at_confirm();
        wizard.submit().unwrap();
        let completed = wizard.draft().clone();

        assert!(wizard.back().is_err());
        assert!(wizard.set_amount(1).is_err());
        assert!(wizard.select_recipient("2").is_err());
        assert_eq!(wizard.draft(), &completed);
    }

    #[test]
    fn test_submit_before_confirm_is_rejected() {
        let (mut wizard, _) = setup_test();
        wizard.select_recipient("1").unwrap();
        wizard.set_amount(2500).unwrap();

        assert!(matches!(wizard.submit(), Err(TransitionError::InvalidStep { .. })));
        assert!(wizard.receipt().is_none());
    }

    #[test]
    fn test_cancel_disposes_wizard() {
        let mut wizard = wizard_at_confirm();

        wizard.cancel();

        assert!(wizard.is_disposed());
        assert!(matches!(wizard.submit(), Err(TransitionError::Disposed)));
        assert!(matches!(wizard.search_recipients(""), Err(TransitionError::Disposed)));
        assert!(wizard.receipt().is_none());
    }
}
