//! Paddock CLI - database migrations and user provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations and create the session table
//! paddock-cli migrate
//!
//! # Create a user with an explicit role
//! paddock-cli user create -u greta --first-name Greta --last-name Vogel \
//!     --birth-date 1979-04-02 -r admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "paddock-cli")]
#[command(author, version, about = "Paddock CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (schema and session table)
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name (3-64 of A-Z a-z 0-9 . _ -)
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(long, env = "PADDOCK_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        bank_account: String,

        /// Birth date as YYYY-MM-DD
        #[arg(long)]
        birth_date: String,

        /// Role (`admin`, `staff`, `customer`)
        #[arg(short, long, default_value = "customer")]
        role: String,

        /// Preferred UI language (default: de)
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                first_name,
                last_name,
                address,
                bank_account,
                birth_date,
                role,
                language,
            } => {
                commands::user::create(commands::user::NewAccount {
                    username,
                    password,
                    first_name,
                    last_name,
                    address,
                    bank_account,
                    birth_date,
                    role,
                    language,
                })
                .await?;
            }
        },
    }
    Ok(())
}
