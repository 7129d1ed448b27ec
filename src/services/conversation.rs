//! Conversation log service
//!
//! Records collaborator exchanges for audit and debugging. Runs in its own
//! storage scope, never inside a ledger operation, so a failure here cannot
//! roll back or block money movement.

use chrono::Utc;

use crate::error::LedgerResult;
use crate::models::{ConversationEntry, ConversationId, NewConversationEntry};
use crate::storage::{ConversationRepository, Storage};

/// Service for the conversation log
pub struct ConversationService<'a> {
    storage: &'a Storage,
}

impl<'a> ConversationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Best-effort append
    ///
    /// Failures are logged and swallowed; the id is returned when the entry
    /// was stored.
    pub fn record(&self, entry: NewConversationEntry) -> Option<ConversationId> {
        match self.try_record(&entry) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    intent = %entry.intent,
                    error = %e,
                    "failed to record conversation entry"
                );
                None
            }
        }
    }

    /// Append, surfacing any storage error
    pub fn try_record(&self, entry: &NewConversationEntry) -> LedgerResult<ConversationId> {
        let id = self
            .storage
            .atomic(|tx| ConversationRepository::new(tx).insert(entry, Utc::now()))?;

        tracing::debug!(conversation_id = %id, intent = %entry.intent, "conversation recorded");
        Ok(id)
    }

    /// Most recent entries, newest first
    pub fn recent(&self, limit: usize) -> LedgerResult<Vec<ConversationEntry>> {
        self.storage
            .read(|conn| ConversationRepository::new(conn).recent(limit))
    }
}
