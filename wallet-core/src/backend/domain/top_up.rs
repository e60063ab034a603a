//! Adding money to the wallet from an external funding source.
//!
//! The flow is simulated: it validates the request and produces a
//! [`TopUpReceipt`] but never changes a balance.

use std::sync::Arc;
use tracing::info;

use crate::backend::domain::card_input::{is_card_form_valid, CardFormService, MAX_CARD_DIGITS};
use crate::backend::domain::identifiers::IdGenerator;
use crate::backend::domain::money::MoneyService;
use shared::{AmountValidationError, FundingSource, TopUpReceipt};

#[derive(Debug, thiserror::Error)]
pub enum TopUpError {
    #[error("{message}")]
    InvalidAmount {
        error: AmountValidationError,
        message: String,
    },
    #[error("Please fill in the {0} field")]
    MissingField(&'static str),
    #[error("Please fill in all card details correctly")]
    InvalidCard,
}

#[derive(Clone)]
pub struct TopUpService {
    money: MoneyService,
    ids: Arc<dyn IdGenerator>,
}

impl TopUpService {
    pub fn new(money: MoneyService, ids: Arc<dyn IdGenerator>) -> Self {
        Self { money, ids }
    }

    pub fn money(&self) -> &MoneyService {
        &self.money
    }

    /// Check the amount and the fields the funding source needs.
    /// Returns the amount in cents.
    pub fn validate_top_up(&self, amount_input: &str, source: &FundingSource) -> Result<u64, TopUpError> {
        let validation = self.money.validate_amount_input(amount_input);
        let amount_cents = match (validation.amount_cents, validation.errors.into_iter().next()) {
            (Some(cents), None) => cents,
            (_, Some(error)) => {
                let message = self.money.error_message(&error);
                return Err(TopUpError::InvalidAmount { error, message });
            }
            (None, None) => {
                let error = AmountValidationError::EmptyAmount;
                let message = self.money.error_message(&error);
                return Err(TopUpError::InvalidAmount { error, message });
            }
        };

        self.validate_source(source)?;
        Ok(amount_cents)
    }

    /// Receipt for a validated top-up
    pub fn create_receipt(&self, amount_cents: u64, source: &FundingSource) -> TopUpReceipt {
        let fee_cents = source.fee_cents();
        let receipt = TopUpReceipt {
            reference_id: self.ids.top_up_reference(),
            amount_cents,
            fee_cents,
            total_cents: amount_cents.saturating_add(fee_cents),
            method: source.name().to_string(),
        };

        info!(
            "Top-up {} of {} via {} (fee {})",
            receipt.reference_id,
            self.money.format_cents(amount_cents),
            receipt.method,
            self.money.format_cents(fee_cents)
        );
        receipt
    }

    fn validate_source(&self, source: &FundingSource) -> Result<(), TopUpError> {
        match source {
            FundingSource::Card {
                number,
                name,
                expiry,
                cvv,
            } => {
                for (field, value) in [("number", number), ("name", name), ("expiry", expiry), ("cvv", cvv)] {
                    if value.trim().is_empty() {
                        return Err(TopUpError::MissingField(field));
                    }
                }

                if number.chars().filter(char::is_ascii_digit).count() > MAX_CARD_DIGITS {
                    return Err(TopUpError::InvalidCard);
                }

                let forms = CardFormService::new();
                let form = forms.apply_number_input(CardFormService::create_form_state(), number);
                let form = forms.apply_name_input(form, name.trim());
                let form = forms.apply_expiry_input(form, expiry);
                let form = forms.apply_cvv_input(form, cvv);
                if !is_card_form_valid(&form) {
                    return Err(TopUpError::InvalidCard);
                }
            }
            FundingSource::Bank {
                account_number,
                routing_number,
            } => {
                for (field, value) in [("account_number", account_number), ("routing_number", routing_number)] {
                    let value = value.trim();
                    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
                        return Err(TopUpError::MissingField(field));
                    }
                }
            }
            FundingSource::Mobile => {}
        }
        Ok(())
    }
}
