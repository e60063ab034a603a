//! Mock records the demo dashboard starts with

use shared::{CardNetwork, Recipient, SavedCard};

fn contact(id: &str, name: &str, handle: &str, phone: &str, email: &str, is_frequent: bool) -> Recipient {
    Recipient {
        id: id.to_string(),
        display_name: name.to_string(),
        handle: handle.to_string(),
        phone: Some(phone.to_string()),
        email: Some(email.to_string()),
        is_frequent,
    }
}

pub fn mock_contacts() -> Vec<Recipient> {
    vec![
        contact("1", "Sarah Johnson", "@sarah_j", "+1 (555) 123-4567", "sarah@example.com", true),
        contact("2", "Mike Chen", "@mike_c", "+1 (555) 987-6543", "mike@example.com", true),
        contact("3", "Emma Wilson", "@emma_w", "+1 (555) 456-7890", "emma@example.com", false),
    ]
}

pub fn mock_saved_cards() -> Vec<SavedCard> {
    vec![
        SavedCard {
            id: "1".to_string(),
            number: "4532123456789012".to_string(),
            name: "JOHN DOE".to_string(),
            expiry: "12/26".to_string(),
            network: CardNetwork::Visa,
            is_default: true,
            added_date: "Jan 10, 2024".to_string(),
        },
        SavedCard {
            id: "2".to_string(),
            number: "5555444433332222".to_string(),
            name: "JOHN DOE".to_string(),
            expiry: "08/25".to_string(),
            network: CardNetwork::Mastercard,
            is_default: false,
            added_date: "Dec 15, 2023".to_string(),
        },
    ]
}
