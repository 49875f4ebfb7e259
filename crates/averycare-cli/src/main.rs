use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "averycare")]
#[command(about = "AveryCare CLI - schedule AI health calls for your family", long_about = None)]
struct Cli {
    /// Backend API base URL, overriding config.toml and AVERYCARE_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, log in and manage the user session
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthCommand,
    },
    /// Manage your family members
    Family {
        #[command(subcommand)]
        action: commands::family::FamilyCommand,
    },
    /// Schedule and review health calls
    Calls {
        #[command(subcommand)]
        action: commands::calls::CallsCommand,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminCommand,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut ctx = Context::build(cli.api_url)?;

    match cli.command {
        Commands::Auth { action } => commands::auth::run(&mut ctx, action).await,
        Commands::Family { action } => commands::family::run(&mut ctx, action).await,
        Commands::Calls { action } => commands::calls::run(&mut ctx, action).await,
        Commands::Admin { action } => commands::admin::run(&mut ctx, action).await,
    }
}
