use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Fee charged for mobile wallet top-ups, in cents
pub const MOBILE_PAYMENT_FEE_CENTS: u64 = 50;

/// A person money can be sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    /// Human-readable name shown in the picker
    pub display_name: String,
    /// Short identifier such as "@sarah_j"
    pub handle: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Only used for grouping in the picker, never for identity
    pub is_frequent: bool,
}

/// Input of the "add new recipient" sub-form. Empty strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRecipientRequest {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub email: String,
}

/// Recipient search results split for presentation, frequent contacts first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientGroups {
    pub frequent: Vec<Recipient>,
    pub others: Vec<Recipient>,
}

/// Steps of the transfer wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStep {
    SelectRecipient,
    EnterAmount,
    Confirm,
    /// Terminal step, the draft no longer changes
    Complete,
}

/// Record produced when a transfer draft reaches `Complete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Reference in the form "TXN-<year>-<suffix>"
    pub reference_id: String,
    pub recipient: Recipient,
    pub amount_cents: u64,
    pub note: Option<String>,
}

/// Card network guessed from the leading digit of a card number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    #[default]
    Unknown,
}

/// Field values of the add-card form, updated per keystroke
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFormState {
    /// Up to 16 digits, no separators
    pub raw_digits: String,
    /// `raw_digits` in groups of four separated by a single space
    pub formatted_number: String,
    /// Always derived from `raw_digits`
    pub network: CardNetwork,
    /// "MM/YY", built incrementally
    pub expiry: String,
    pub cvv: String,
    /// Cardholder name, upper-cased
    pub name: String,
    pub is_default: bool,
}

/// A payment card stored in the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCard {
    pub id: String,
    /// Card number digits without separators
    pub number: String,
    pub name: String,
    pub expiry: String,
    pub network: CardNetwork,
    pub is_default: bool,
    /// Display date, e.g. "Jan 10, 2024"
    pub added_date: String,
}

/// Result of validating a free-text currency amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountValidation {
    pub is_valid: bool,
    pub errors: Vec<AmountValidationError>,
    /// Amount in minor units, only set when the input is valid
    pub amount_cents: Option<u64>,
}

/// Specific validation errors for amount inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountValidationError {
    EmptyAmount,
    InvalidAmountFormat(String),
    AmountNotPositive,
    AmountTooSmall(u64),
    AmountTooLarge(u64),
    AmountPrecisionTooHigh,
}

/// Where money for a top-up comes from, with the fields each method needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FundingSource {
    Card {
        number: String,
        name: String,
        expiry: String,
        cvv: String,
    },
    Bank {
        account_number: String,
        routing_number: String,
    },
    Mobile,
}

/// Record produced by a simulated top-up. The balance is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUpReceipt {
    /// Reference in the form "ADD-<year>-<suffix>"
    pub reference_id: String,
    pub amount_cents: u64,
    pub fee_cents: u64,
    pub total_cents: u64,
    pub method: String,
}

/// Configuration for the wallet flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub currency_symbol: String,
    pub min_amount_cents: u64,
    pub max_amount_cents: u64,
    pub max_note_length: usize,
    /// Simulated processing time before a submission completes
    pub processing_delay_ms: u64,
    /// Time a success screen stays up before the host is asked to close it
    pub auto_dismiss_ms: u64,
    /// Whole currency units offered as one-tap amounts in the transfer flow
    pub transfer_quick_amounts: Vec<u64>,
    /// Whole currency units offered as one-tap amounts in the top-up flow
    pub top_up_quick_amounts: Vec<u64>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            min_amount_cents: 1,
            max_amount_cents: 100_000_000,
            max_note_length: 256,
            processing_delay_ms: 2000,
            auto_dismiss_ms: 3000,
            transfer_quick_amounts: vec![10, 25, 50, 100],
            top_up_quick_amounts: vec![25, 50, 100, 200],
        }
    }
}

impl WalletConfig {
    /// Parse a YAML document; missing keys keep their default values
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn auto_dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_ms)
    }
}

impl Recipient {
    /// Handle used when the user did not supply one: "@" + lowercase name with
    /// whitespace runs replaced by underscores
    pub fn default_handle(name: &str) -> String {
        let lowered = name.to_lowercase();
        let joined = lowered.split_whitespace().collect::<Vec<_>>().join("_");
        format!("@{}", joined)
    }

    /// Make sure a user-supplied handle starts with "@"
    pub fn normalize_handle(handle: &str) -> String {
        let trimmed = handle.trim();
        if trimmed.starts_with('@') {
            trimmed.to_string()
        } else {
            format!("@{}", trimmed)
        }
    }

    /// Avatar fallback: first letter of each part of the name
    pub fn initials(&self) -> String {
        self.display_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Case-insensitive substring match on the name or the handle
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.display_name.to_lowercase().contains(&query)
            || self.handle.to_lowercase().contains(&query)
    }
}

impl RecipientGroups {
    pub fn len(&self) -> usize {
        self.frequent.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequent.is_empty() && self.others.is_empty()
    }
}

impl TransferStep {
    /// 1-based position in the progress bar. `Complete` sits past the last step.
    pub fn step_number(&self) -> u8 {
        match self {
            TransferStep::SelectRecipient => 1,
            TransferStep::EnterAmount => 2,
            TransferStep::Confirm => 3,
            TransferStep::Complete => 3,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.step_number()) * 100 / 3) as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            TransferStep::SelectRecipient => "Select Recipient",
            TransferStep::EnterAmount => "Enter Amount",
            TransferStep::Confirm => "Confirm Transfer",
            TransferStep::Complete => "Transfer Complete",
        }
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl CardNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "visa",
            CardNetwork::Mastercard => "mastercard",
            CardNetwork::Amex => "amex",
            CardNetwork::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SavedCard {
    pub fn last_four(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        &self.number[start..]
    }

    /// "•••• •••• •••• 9012"
    pub fn masked_number(&self) -> String {
        format!("•••• •••• •••• {}", self.last_four())
    }
}

impl FundingSource {
    pub fn name(&self) -> &'static str {
        match self {
            FundingSource::Card { .. } => "Debit/Credit Card",
            FundingSource::Bank { .. } => "Bank Transfer",
            FundingSource::Mobile => "Mobile Payment",
        }
    }

    pub fn processing_time(&self) -> &'static str {
        match self {
            FundingSource::Card { .. } | FundingSource::Mobile => "Instant",
            FundingSource::Bank { .. } => "1-3 business days",
        }
    }

    pub fn fee_cents(&self) -> u64 {
        match self {
            FundingSource::Mobile => MOBILE_PAYMENT_FEE_CENTS,
            _ => 0,
        }
    }

    /// Names of the fields this method needs before a top-up can be submitted
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FundingSource::Card { .. } => &["number", "name", "expiry", "cvv"],
            FundingSource::Bank { .. } => &["account_number", "routing_number"],
            FundingSource::Mobile => &[],
        }
    }
}
