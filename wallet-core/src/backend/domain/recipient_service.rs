use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::identifiers::IdGenerator;
use crate::backend::storage::RecipientDirectory;
use shared::{AddRecipientRequest, Recipient, RecipientGroups};

#[derive(Debug, thiserror::Error)]
pub enum RecipientError {
    #[error("Recipient name cannot be empty")]
    EmptyName,
    #[error("Recipient needs a username, phone number or email")]
    MissingContactMethod,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Recipients matching `query` in directory order
pub fn filter_recipients(recipients: &[Recipient], query: &str) -> Vec<Recipient> {
    recipients
        .iter()
        .filter(|r| r.matches_query(query))
        .cloned()
        .collect()
}

/// Stable split into frequent and other recipients
pub fn group_by_frequency(recipients: Vec<Recipient>) -> RecipientGroups {
    let (frequent, others): (Vec<Recipient>, Vec<Recipient>) =
        recipients.into_iter().partition(|r| r.is_frequent);
    RecipientGroups { frequent, others }
}

/// Service for looking up and adding recipients in the directory
#[derive(Clone)]
pub struct RecipientService {
    directory: Arc<dyn RecipientDirectory>,
    ids: Arc<dyn IdGenerator>,
}

impl RecipientService {
    pub fn new(directory: Arc<dyn RecipientDirectory>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { directory, ids }
    }

    /// Search by name or handle, frequent contacts first
    pub fn search(&self, query: &str) -> Result<RecipientGroups, RecipientError> {
        let recipients = self.directory.list()?;
        let groups = group_by_frequency(filter_recipients(&recipients, query));
        info!("Recipient search '{}' matched {} of {}", query, groups.len(), recipients.len());
        Ok(groups)
    }

    pub fn find(&self, recipient_id: &str) -> Result<Option<Recipient>, RecipientError> {
        let recipient = self
            .directory
            .list()?
            .into_iter()
            .find(|r| r.id == recipient_id);

        if recipient.is_none() {
            warn!("Recipient not found: {}", recipient_id);
        }

        Ok(recipient)
    }

    /// Number of frequent contacts in the whole directory, ignoring any search
    pub fn frequent_count(&self) -> Result<usize, RecipientError> {
        Ok(self.directory.list()?.iter().filter(|r| r.is_frequent).count())
    }

    /// Validate the request, append the new recipient and return it
    pub fn add_recipient(&self, request: AddRecipientRequest) -> Result<Recipient, RecipientError> {
        let recipient = self.build_recipient(request)?;
        self.directory.append(recipient.clone())?;

        info!("Added recipient: {} with ID: {}", recipient.display_name, recipient.id);
        Ok(recipient)
    }

    fn build_recipient(&self, request: AddRecipientRequest) -> Result<Recipient, RecipientError> {
        self.validate_add_request(&request)?;

        let name = request.name.trim().to_string();
        let handle = if request.username.trim().is_empty() {
            Recipient::default_handle(&name)
        } else {
            Recipient::normalize_handle(&request.username)
        };

        Ok(Recipient {
            id: self.ids.recipient_id(),
            handle,
            phone: non_empty(request.phone),
            email: non_empty(request.email),
            display_name: name,
            is_frequent: false,
        })
    }

    fn validate_add_request(&self, request: &AddRecipientRequest) -> Result<(), RecipientError> {
        if request.name.trim().is_empty() {
            return Err(RecipientError::EmptyName);
        }

        let has_contact = [&request.username, &request.phone, &request.email]
            .iter()
            .any(|field| !field.trim().is_empty());
        if !has_contact {
            return Err(RecipientError::MissingContactMethod);
        }

        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
