//! User Provisioning Tool
//!
//! Users are never created over HTTP. This CLI writes them straight into the
//! credential store the service reads from.
//!
//! Usage:
//!   cargo run --bin ticketgate-user -- --database-url sqlite://tickets.db add --name gate1 --role authenticator
//!   cargo run --bin ticketgate-user -- --database-url sqlite://tickets.db show --name gate1

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ticketgate_backend::{
    auth::{PasswordHasher, User, UserRole},
    config::load_env,
    store::{CredentialStore, SqliteStore},
};

/// Provision ticket gate staff accounts
#[derive(Parser, Debug)]
#[command(name = "ticketgate-user")]
#[command(about = "Create and inspect ticket gate users")]
struct Cli {
    /// Credential store URL (sqlite://<path>)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a user
    Add {
        #[arg(short, long)]
        name: String,

        /// Password (prefer the env var to keep it out of shell history)
        #[arg(short, long, env = "TICKETGATE_PASSWORD", hide_env_values = true)]
        password: String,

        /// validator or authenticator
        #[arg(short, long)]
        role: UserRole,
    },

    /// Show a user's role
    Show {
        #[arg(short, long)]
        name: String,
    },
}

fn main() -> Result<()> {
    load_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketgate_backend=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = SqliteStore::open(&cli.database_url).context("Failed to open credential store")?;

    match cli.command {
        Commands::Add {
            name,
            password,
            role,
        } => {
            if name.trim().is_empty() {
                bail!("User name must not be empty");
            }
            if password.len() < 8 {
                bail!("Password must be at least 8 characters");
            }

            let user = User {
                name,
                password_hash: PasswordHasher::default().hash(&password)?,
                role: Some(role),
            };
            store
                .insert_user(&user)
                .with_context(|| format!("Failed to create user {}", user.name))?;
            println!("Created {} ({})", user.name, role);
        }
        Commands::Show { name } => match store.find_user_by_name(&name)? {
            Some(user) => match user.role {
                Some(role) => println!("{}: {}", user.name, role),
                None => println!("{}: <unrecognized role>", user.name),
            },
            None => bail!("No such user: {}", name),
        },
    }

    Ok(())
}
