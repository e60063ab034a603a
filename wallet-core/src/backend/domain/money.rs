//! Money input handling for the wallet flows.
//!
//! Hosts collect amounts as free text ("25", "$1,234.50"). This module turns
//! that text into integer minor units before it reaches the transfer wizard
//! or the top-up flow, and formats cents back for display. Floating point is
//! never involved.

use shared::{AmountValidation, AmountValidationError, WalletConfig};

/// Money service that handles amount parsing, validation and formatting
#[derive(Debug, Clone)]
pub struct MoneyService {
    config: WalletConfig,
}

impl MoneyService {
    pub fn new() -> Self {
        Self {
            config: WalletConfig::default(),
        }
    }

    pub fn with_config(config: WalletConfig) -> Self {
        Self { config }
    }

    /// Validate a free-text amount against the configured bounds
    pub fn validate_amount_input(&self, amount_input: &str) -> AmountValidation {
        let mut errors = Vec::new();

        let amount_cents = if amount_input.trim().is_empty() {
            errors.push(AmountValidationError::EmptyAmount);
            None
        } else {
            match self.parse_amount_to_cents(amount_input) {
                Ok(cents) if cents <= 0 => {
                    errors.push(AmountValidationError::AmountNotPositive);
                    None
                }
                Ok(cents) => {
                    let cents = cents.unsigned_abs();
                    if cents < self.config.min_amount_cents {
                        errors.push(AmountValidationError::AmountTooSmall(self.config.min_amount_cents));
                        None
                    } else if cents > self.config.max_amount_cents {
                        errors.push(AmountValidationError::AmountTooLarge(self.config.max_amount_cents));
                        None
                    } else {
                        Some(cents)
                    }
                }
                Err(error) => {
                    errors.push(error);
                    None
                }
            }
        };

        AmountValidation {
            is_valid: errors.is_empty(),
            errors,
            amount_cents,
        }
    }

    /// Parse a decimal currency string into cents.
    ///
    /// Accepts an optional leading minus, the configured currency symbol,
    /// thousands separators and at most two fraction digits.
    pub fn parse_amount_to_cents(&self, amount_input: &str) -> Result<i64, AmountValidationError> {
        let cleaned = amount_input
            .trim()
            .replace(&self.config.currency_symbol, "")
            .replace(',', "")
            .replace(' ', "");

        if cleaned.is_empty() {
            return Err(AmountValidationError::InvalidAmountFormat(
                "Empty amount after cleaning".to_string(),
            ));
        }

        let (negative, unsigned) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(AmountValidationError::InvalidAmountFormat(format!(
                "Invalid number format: {}",
                amount_input.trim()
            )));
        }

        if fraction.len() > 2 {
            return Err(AmountValidationError::AmountPrecisionTooHigh);
        }

        let too_large = || AmountValidationError::InvalidAmountFormat("Amount is too large".to_string());

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| too_large())? * 10,
            _ => fraction.parse().map_err(|_| too_large())?,
        };

        let cents = whole_units
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(too_large)?;

        Ok(if negative { -cents } else { cents })
    }

    /// Format cents for display, e.g. "$25.00"
    pub fn format_cents(&self, cents: u64) -> String {
        format!("{}{}.{:02}", self.config.currency_symbol, cents / 100, cents % 100)
    }

    /// Get user-friendly error message for a validation error
    pub fn error_message(&self, error: &AmountValidationError) -> String {
        match error {
            AmountValidationError::EmptyAmount => "Please enter an amount".to_string(),
            AmountValidationError::InvalidAmountFormat(msg) => {
                format!("Please enter a valid amount (like 5 or 5.00): {}", msg)
            }
            AmountValidationError::AmountNotPositive => "Amount must be greater than 0".to_string(),
            AmountValidationError::AmountTooSmall(min) => {
                format!("Amount is too small. Minimum is {}", self.format_cents(*min))
            }
            AmountValidationError::AmountTooLarge(max) => {
                format!("Amount is too large. Maximum is {}", self.format_cents(*max))
            }
            AmountValidationError::AmountPrecisionTooHigh => {
                "Amount has too many decimal places. Use at most 2 decimal places.".to_string()
            }
        }
    }

    /// Get the first error message (for displaying a single error)
    pub fn first_error_message(&self, errors: &[AmountValidationError]) -> Option<String> {
        errors.first().map(|e| self.error_message(e))
    }

    /// One-tap amounts of the transfer flow, in cents
    pub fn transfer_quick_amounts(&self) -> Vec<u64> {
        self.config.transfer_quick_amounts.iter().map(|units| units * 100).collect()
    }

    /// One-tap amounts of the top-up flow, in cents
    pub fn top_up_quick_amounts(&self) -> Vec<u64> {
        self.config.top_up_quick_amounts.iter().map(|units| units * 100).collect()
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }
}

impl Default for MoneyService {
    fn default() -> Self {
        Self::new()
    }
}
