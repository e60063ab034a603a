//! Card input formatting and validation.
//!
//! Pure functions invoked per keystroke by the add-card form. Every update
//! stores the raw field value first and then recomputes derived fields from
//! it, so `formatted_number` and `network` can never go stale.
//!
//! `is_card_form_valid` is a completeness check only. It does not run a Luhn
//! check and says nothing about whether a card number is real.

use shared::{CardFormState, CardNetwork};

pub const MAX_CARD_DIGITS: usize = 16;
pub const MIN_CARD_DIGITS: usize = 13;
pub const EXPIRY_LENGTH: usize = 5;
const MAX_EXPIRY_DIGITS: usize = 4;
const MAX_CVV_DIGITS: usize = 4;
const MIN_CVV_DIGITS: usize = 3;

fn digits_only(raw: &str, limit: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(limit).collect()
}

/// Strip non-digits, keep at most 16 and group them in runs of four
pub fn format_number(raw: &str) -> String {
    let digits = digits_only(raw, MAX_CARD_DIGITS);
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(digit);
    }
    formatted
}

/// Guess the card network from the first digit.
///
/// This is a simplified prefix rule, not BIN range validation.
pub fn detect_network(raw: &str) -> CardNetwork {
    match raw.chars().find(|c| !c.is_whitespace()) {
        Some('4') => CardNetwork::Visa,
        Some('5') | Some('2') => CardNetwork::Mastercard,
        Some('3') => CardNetwork::Amex,
        _ => CardNetwork::Unknown,
    }
}

/// Build "MM/YY" from up to four digits. The slash appears once a third
/// digit is typed, so deleting back to two digits never leaves a dangling "/".
pub fn format_expiry(raw: &str) -> String {
    let digits = digits_only(raw, MAX_EXPIRY_DIGITS);
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

pub fn format_cvv(raw: &str) -> String {
    digits_only(raw, MAX_CVV_DIGITS)
}

pub fn format_cardholder_name(raw: &str) -> String {
    raw.to_uppercase()
}

pub fn is_card_form_valid(state: &CardFormState) -> bool {
    state.raw_digits.len() >= MIN_CARD_DIGITS
        && !state.name.is_empty()
        && state.expiry.len() == EXPIRY_LENGTH
        && state.cvv.len() >= MIN_CVV_DIGITS
}

/// Non-fatal warning shown once the user has started typing a number but the
/// form is still incomplete
pub fn incomplete_form_warning(state: &CardFormState) -> Option<String> {
    if state.raw_digits.is_empty() || is_card_form_valid(state) {
        return None;
    }
    Some("Please fill in all card details correctly".to_string())
}

/// Applies keystrokes to a [`CardFormState`]
#[derive(Debug, Clone, Default)]
pub struct CardFormService;

impl CardFormService {
    pub fn new() -> Self {
        Self
    }

    /// Create an empty form state
    pub fn create_form_state() -> CardFormState {
        CardFormState::default()
    }

    /// Update the card number from the text field; derived fields follow
    pub fn apply_number_input(&self, mut state: CardFormState, input: &str) -> CardFormState {
        state.raw_digits = digits_only(input, MAX_CARD_DIGITS);
        state.formatted_number = format_number(&state.raw_digits);
        state.network = detect_network(&state.raw_digits);
        state
    }

    pub fn apply_expiry_input(&self, mut state: CardFormState, input: &str) -> CardFormState {
        state.expiry = format_expiry(input);
        state
    }

    pub fn apply_cvv_input(&self, mut state: CardFormState, input: &str) -> CardFormState {
        state.cvv = format_cvv(input);
        state
    }

    pub fn apply_name_input(&self, mut state: CardFormState, input: &str) -> CardFormState {
        state.name = format_cardholder_name(input);
        state
    }

    pub fn set_default(&self, mut state: CardFormState, is_default: bool) -> CardFormState {
        state.is_default = is_default;
        state
    }

    /// Clear all fields after a successful submission
    pub fn clear_form(&self) -> CardFormState {
        Self::create_form_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> CardFormState {
        let service = CardFormService::new();
        let state = CardFormService::create_form_state();
        let state = service.apply_number_input(state, "4111 1111 1111 1111");
        let state = service.apply_name_input(state, "john");
        let state = service.apply_expiry_input(state, "1225");
        service.apply_cvv_input(state, "123")
    }

    #[test]
    fn test_format_number_groups_digits() {
        assert_eq!(format_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_number("41111"), "4111 1");
        assert_eq!(format_number("4111-1111 abc 22"), "4111 1111 22");
        assert_eq!(format_number(""), "");
        assert_eq!(format_number("41111111111111112222"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_format_number_shape_and_idempotence() {
        for len in 0..=16 {
            let digits: String = "1234567890123456".chars().take(len).collect();
            let formatted = format_number(&digits);

            assert!(!formatted.starts_with(' '));
            assert!(!formatted.ends_with(' '));
            assert!(!formatted.contains("  "));
            assert!(formatted.chars().all(|c| c.is_ascii_digit() || c == ' '));
            assert!(formatted.split(' ').all(|group| group.len() <= 4));
            assert_eq!(format_number(&formatted), formatted);
        }
    }

    #[test]
    fn test_detect_network() {
        assert_eq!(detect_network("4111111111111111"), CardNetwork::Visa);
        assert_eq!(detect_network("5500000000000004"), CardNetwork::Mastercard);
        assert_eq!(detect_network("2221000000000009"), CardNetwork::Mastercard);
        assert_eq!(detect_network("340000000000009"), CardNetwork::Amex);
        assert_eq!(detect_network(" 4111"), CardNetwork::Visa);
        assert_eq!(detect_network("6011000000000004"), CardNetwork::Unknown);
        assert_eq!(detect_network(""), CardNetwork::Unknown);
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12");
        assert_eq!(format_expiry("122"), "12/2");
        assert_eq!(format_expiry("1225"), "12/25");
        assert_eq!(format_expiry("12/25"), "12/25");
        assert_eq!(format_expiry("12/259"), "12/25");
        assert_eq!(format_expiry("12/"), "12");
        assert!(format_expiry("99999999").len() <= EXPIRY_LENGTH);
    }

    #[test]
    fn test_cvv_and_name() {
        assert_eq!(format_cvv("12a3"), "123");
        assert_eq!(format_cvv("123456"), "1234");
        assert_eq!(format_cardholder_name("John Doe"), "JOHN DOE");
    }

    #[test]
    fn test_is_card_form_valid() {
        assert!(is_card_form_valid(&complete_form()));

        let too_short = CardFormState {
            raw_digits: "123".to_string(),
            name: "A".to_string(),
            expiry: "12/25".to_string(),
            cvv: "123".to_string(),
            ..CardFormState::default()
        };
        assert!(!is_card_form_valid(&too_short));

        let sixteen = CardFormState {
            raw_digits: "4111111111111111".to_string(),
            name: "JOHN".to_string(),
            expiry: "12/25".to_string(),
            cvv: "123".to_string(),
            ..CardFormState::default()
        };
        assert!(is_card_form_valid(&sixteen));

        let partial_expiry = CardFormState {
            expiry: "12/2".to_string(),
            ..sixteen.clone()
        };
        assert!(!is_card_form_valid(&partial_expiry));

        let no_name = CardFormState {
            name: String::new(),
            ..sixteen
        };
        assert!(!is_card_form_valid(&no_name));
    }

    #[test]
    fn test_number_input_recomputes_derived_fields() {
        let service = CardFormService::new();
        let state = service.apply_number_input(CardFormService::create_form_state(), "4111 11");
        assert_eq!(state.raw_digits, "411111");
        assert_eq!(state.formatted_number, "4111 11");
        assert_eq!(state.network, CardNetwork::Visa);

        let state = service.apply_number_input(state, "5111 11");
        assert_eq!(state.network, CardNetwork::Mastercard);

        let state = service.apply_number_input(state, "");
        assert_eq!(state.formatted_number, "");
        assert_eq!(state.network, CardNetwork::Unknown);
    }

    #[test]
    fn test_incomplete_form_warning() {
        let service = CardFormService::new();
        let empty = CardFormService::create_form_state();
        assert_eq!(incomplete_form_warning(&empty), None);

        let typing = service.apply_number_input(empty, "4111");
        assert!(incomplete_form_warning(&typing).is_some());

        assert_eq!(incomplete_form_warning(&complete_form()), None);
    }
}
