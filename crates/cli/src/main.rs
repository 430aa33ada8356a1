//! Persimmon Market CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! persimmon-cli migrate
//!
//! # Seed demo users and products
//! persimmon-cli seed
//!
//! # Suspend / unsuspend an account
//! persimmon-cli admin suspend -u 3
//! persimmon-cli admin unsuspend -u 3
//!
//! # Change roles or reset a password
//! persimmon-cli admin set-role -u 3 --admin
//! persimmon-cli admin reset-password -u 3 -p "newpassword1"
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATABASE_URL` - SQLite connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "persimmon-cli")]
#[command(author, version, about = "Persimmon Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo users and products
    Seed,
    /// Manage user accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Suspend a user account
    Suspend {
        /// User ID
        #[arg(short, long)]
        user: i64,
    },
    /// Lift a suspension
    Unsuspend {
        /// User ID
        #[arg(short, long)]
        user: i64,
    },
    /// Change a user's admin/seller roles
    SetRole {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Grant admin privileges
        #[arg(long)]
        admin: bool,

        /// Grant seller privileges
        #[arg(long)]
        seller: bool,
    },
    /// Reset a user's password
    ResetPassword {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// The new password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Suspend { user } => commands::admin::set_suspended(user, true).await?,
            AdminAction::Unsuspend { user } => {
                commands::admin::set_suspended(user, false).await?;
            }
            AdminAction::SetRole {
                user,
                admin,
                seller,
            } => commands::admin::set_role(user, admin, seller).await?,
            AdminAction::ResetPassword { user, password } => {
                commands::admin::reset_password(user, &password).await?;
            }
        },
    }
    Ok(())
}
