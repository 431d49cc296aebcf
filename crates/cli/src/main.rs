//! `drops` command-line front-end.
//!
//! Loads `.env`, resolves the SDK configuration once, and drives
//! builders → execution gateway → object-change resolver.
//! Run with: `drops <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{
    Address, CheckConfig, CreateCollection, MintDrop, ShowCollection, ShowCollections, ShowDrop,
};

/// Create collections and mint drops on Sui
#[derive(Parser)]
#[command(name = "drops")]
#[command(about = "Drops SDK command-line client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Validate configuration and signing key without touching the network
    CheckConfig(CheckConfig),

    /// Print the signer's address
    Address(Address),

    /// Create a collection
    CreateCollection(CreateCollection),

    /// Mint a drop from a collection
    MintDrop(MintDrop),

    /// List collections in the collections registry
    Collections(ShowCollections),

    /// Show one collection
    Collection(ShowCollection),

    /// Show one drop
    Drop(ShowDrop),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional; the process environment wins
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::CheckConfig(cmd) => cmd.execute(),
        Command::Address(cmd) => cmd.execute(),
        Command::CreateCollection(cmd) => cmd.execute().await,
        Command::MintDrop(cmd) => cmd.execute().await,
        Command::Collections(cmd) => cmd.execute().await,
        Command::Collection(cmd) => cmd.execute().await,
        Command::Drop(cmd) => cmd.execute().await,
    }
}
