use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use teller::cli::{
    handle_account_command, handle_balance, handle_conversation_command, handle_deposit,
    handle_exec, handle_export, handle_history, handle_transfer, handle_withdraw,
    AccountCommands, ConversationCommands, ExportFormat,
};
use teller::config::{Settings, TellerPaths};
use teller::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "teller",
    version,
    about = "Account ledger with atomic deposits, withdrawals, and transfers",
    long_about = "teller keeps account balances and an append-only transaction log in a \
                  single SQLite database. Every money movement commits as one atomic \
                  unit. Collaborating programs drive it with structured JSON requests \
                  through `teller exec`."
)]
struct Cli {
    /// Data directory (defaults to the platform config directory)
    #[arg(long, env = "TELLER_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the ledger database
    Init {
        /// Also create the configured demo account
        #[arg(long)]
        demo: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Deposit money into an account
    Deposit {
        /// Username or ID
        account: String,
        /// Amount (e.g., "25.50")
        amount: String,
    },

    /// Withdraw money from an account
    #[command(alias = "withdrawal")]
    Withdraw {
        /// Username or ID
        account: String,
        /// Amount (e.g., "25.50")
        amount: String,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Sending username
        from: String,
        /// Receiving username
        to: String,
        /// Amount (e.g., "25.50")
        amount: String,
    },

    /// Show an account's balance
    Balance {
        /// Username or ID
        account: String,
    },

    /// Show an account's most recent transactions
    History {
        /// Username or ID
        account: String,
        /// Number of records (defaults to the configured history limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export an account's full history
    Export {
        /// Username or ID
        account: String,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output file path ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Conversation log commands
    #[command(subcommand)]
    Conversation(ConversationCommands),

    /// Execute one JSON request and print the JSON response
    Exec {
        /// Request document (read from stdin when omitted)
        request: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => TellerPaths::with_base_dir(dir),
        None => TellerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    teller::logging::init(&settings);

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("teller - account ledger");
            println!();
            println!("Run 'teller --help' for usage information.");
            return Ok(ExitCode::SUCCESS);
        }
    };

    match &command {
        Commands::Init { demo } => {
            println!("Initializing teller at: {}", paths.base_dir().display());
            let report = initialize_storage(&paths, &settings, *demo)?;
            if report.settings_created {
                println!("Wrote default settings to: {}", paths.settings_file().display());
            }
            println!("Database: {}", report.database.display());
            if let Some(account) = report.demo_account {
                println!(
                    "Created demo account {} with {}",
                    account.username,
                    account.balance.format_with_symbol(&settings.currency_symbol)
                );
            }
            println!("Initialization complete!");
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Config => {
            println!("teller Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Database:         {}", paths.database_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  History limit:   {}", settings.history_limit);
            println!("  Busy timeout:    {} ms", settings.busy_timeout_ms);
            println!("  Log level:       {}", settings.log_level);
            println!("  Log format:      {:?}", settings.log_format);
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    // Opened once for the command and closed explicitly on the way out
    let storage = Storage::open(&paths.database_file(), &settings)
        .with_context(|| format!("Failed to open {}", paths.database_file().display()))?;

    let mut succeeded = true;
    match command {
        Commands::Account(cmd) => handle_account_command(&storage, &settings, cmd)?,
        Commands::Deposit { account, amount } => {
            handle_deposit(&storage, &settings, &account, &amount)?
        }
        Commands::Withdraw { account, amount } => {
            handle_withdraw(&storage, &settings, &account, &amount)?
        }
        Commands::Transfer { from, to, amount } => {
            handle_transfer(&storage, &settings, &from, &to, &amount)?
        }
        Commands::Balance { account } => handle_balance(&storage, &settings, &account)?,
        Commands::History { account, limit } => {
            handle_history(&storage, &settings, &account, limit)?
        }
        Commands::Export {
            account,
            format,
            output,
        } => handle_export(&storage, &paths, &account, format, output)?,
        Commands::Conversation(cmd) => handle_conversation_command(&storage, cmd)?,
        Commands::Exec { request } => succeeded = handle_exec(&storage, &settings, request)?,
        Commands::Init { .. } | Commands::Config => {}
    }

    storage.close()?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
