//! Conversation log CLI commands

use clap::Subcommand;

use crate::display::format_conversation_log;
use crate::error::LedgerResult;
use crate::models::NewConversationEntry;
use crate::services::{ConversationService, QueryService};
use crate::storage::Storage;

/// Conversation subcommands
#[derive(Subcommand)]
pub enum ConversationCommands {
    /// Record one exchange
    Log {
        /// What the collaborator heard
        input: String,
        /// What it answered
        output: String,
        /// Classified intent label
        #[arg(short, long, default_value = "unknown")]
        intent: String,
        /// Classifier confidence
        #[arg(short, long, default_value = "1.0")]
        confidence: f64,
        /// Username or ID the exchange concerned
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Show recent exchanges, newest first
    List {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a conversation command
pub fn handle_conversation_command(storage: &Storage, cmd: ConversationCommands) -> LedgerResult<()> {
    let service = ConversationService::new(storage);

    match cmd {
        ConversationCommands::Log {
            input,
            output,
            intent,
            confidence,
            account,
        } => {
            let account_id = match account {
                Some(account) => Some(QueryService::new(storage).find_required(&account)?.id),
                None => None,
            };

            let entry = NewConversationEntry::new(account_id, input, output, intent, confidence);
            let id = service.try_record(&entry)?;
            println!("Recorded conversation entry {}", id);
        }

        ConversationCommands::List { limit } => {
            let entries = service.recent(limit)?;
            println!("{}", format_conversation_log(&entries));
        }
    }

    Ok(())
}
