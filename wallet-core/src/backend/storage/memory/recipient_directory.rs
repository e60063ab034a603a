use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::seed::mock_contacts;
use crate::backend::storage::traits::RecipientDirectory;
use shared::Recipient;

/// Append-only recipient directory kept in memory for the session
#[derive(Clone, Default)]
pub struct InMemoryRecipientDirectory {
    recipients: Arc<Mutex<Vec<Recipient>>>,
}

impl InMemoryRecipientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipients(recipients: Vec<Recipient>) -> Self {
        Self {
            recipients: Arc::new(Mutex::new(recipients)),
        }
    }

    /// Directory pre-filled with the dashboard's mock contacts
    pub fn seeded() -> Self {
        Self::with_recipients(mock_contacts())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Recipient>>> {
        self.recipients
            .lock()
            .map_err(|_| anyhow::anyhow!("Recipient directory lock poisoned"))
    }
}

impl RecipientDirectory for InMemoryRecipientDirectory {
    fn list(&self) -> Result<Vec<Recipient>> {
        Ok(self.lock()?.clone())
    }

    fn append(&self, recipient: Recipient) -> Result<()> {
        let mut recipients = self.lock()?;
        debug!("Appending recipient {} ({})", recipient.display_name, recipient.id);
        recipients.push(recipient);
        Ok(())
    }
}
