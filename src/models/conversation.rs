//! Conversation entry model
//!
//! Records what a collaborator heard, what it answered, and how it classified
//! the request. Used for audit and debugging only; never part of money
//! movement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, ConversationId};

/// Fields supplied by the collaborator when recording an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConversationEntry {
    pub account_id: Option<AccountId>,
    pub input: String,
    pub output: String,
    pub intent: String,
    pub confidence: Option<f64>,
}

impl NewConversationEntry {
    pub fn new(
        account_id: Option<AccountId>,
        input: impl Into<String>,
        output: impl Into<String>,
        intent: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            account_id,
            input: input.into(),
            output: output.into(),
            intent: intent.into(),
            // NaN and infinities cannot be stored as REAL
            confidence: confidence.is_finite().then_some(confidence),
        }
    }
}

/// A stored conversation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: ConversationId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    pub input: String,
    pub output: String,
    pub intent: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} intent={}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.intent
        );

        if let Some(confidence) = self.confidence {
            output.push_str(&format!(" ({:.2})", confidence));
        }
        if let Some(account_id) = self.account_id {
            output.push_str(&format!(" {}", account_id));
        }

        output.push_str(&format!("\n  > {}\n  < {}", self.input, self.output));
        output
    }
}
