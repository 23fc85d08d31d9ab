//! Clearbank CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! clearbank-cli migrate
//!
//! # Register a customer
//! clearbank-cli customer create -f Ada -l Lovelace -e ada@example.com -p "a secret pw"
//!
//! # Open an account for a customer
//! clearbank-cli account open -e ada@example.com
//!
//! # Transfer money between accounts
//! clearbank-cli account transfer -s 1234567890 -r 0987654321 -a 40.00
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `customer create` - Register a customer
//! - `account open` - Open an account
//! - `account transfer` - Move money between accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "clearbank-cli")]
#[command(author, version, about = "Clearbank CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage bank accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Register a new customer
    Create {
        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Email address (unique)
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Open a new account for a registered customer
    Open {
        /// Customer email address
        #[arg(short, long)]
        email: String,
    },
    /// Transfer money between two accounts
    Transfer {
        /// Sender account number
        #[arg(short, long)]
        sender: String,

        /// Receiver account number
        #[arg(short, long)]
        receiver: String,

        /// Amount, e.g. 40.00
        #[arg(short, long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Customer { action } => match action {
            CustomerAction::Create {
                first_name,
                last_name,
                email,
                password,
            } => {
                commands::customer::create(&first_name, &last_name, &email, &password).await?;
            }
        },
        Commands::Account { action } => match action {
            AccountAction::Open { email } => commands::account::open(&email).await?,
            AccountAction::Transfer {
                sender,
                receiver,
                amount,
            } => {
                commands::account::transfer(&sender, &receiver, &amount).await?;
            }
        },
    }
    Ok(())
}
