use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_SERVER: &str = "http://localhost:5000";

#[derive(Debug, Parser)]
#[command(
    name = "receipts",
    about = "Receipt token service: mint, transfer, and audit receipt tokens",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server on a sandbox ledger
    Serve(ServeArgs),
    /// Generate a new Ed25519 operator key
    Keygen,
    /// Mint a receipt token
    Mint(MintArgs),
    /// Transfer receipt tokens from the operator to an account
    Transfer(TransferArgs),
    /// Associate a token with an account
    Associate(AssociateArgs),
    /// Show an account's balances
    Balance(BalanceArgs),
    /// Show the audit log
    Logs(ServerArgs),
    /// Check that the server is up
    Health(ServerArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Listen address; overrides RECEIPTS_BIND and the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Listen port; overrides PORT and the config file
    #[arg(long)]
    pub port: Option<u16>,
    /// Extra sandbox account to create (repeatable)
    #[arg(long = "sandbox-account")]
    pub sandbox_accounts: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Base URL of a running server
    #[arg(long, env = "RECEIPTS_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,
}

#[derive(Debug, Args)]
pub struct MintArgs {
    #[arg(long)]
    pub recipient: String,
    #[arg(long = "action")]
    pub action_type: String,
    /// Free-form metadata, stored verbatim
    #[arg(long)]
    pub metadata: Option<String>,
    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub to: String,
    #[arg(long, default_value_t = 1)]
    pub amount: u64,
    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Debug, Args)]
pub struct AssociateArgs {
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub account: String,
    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Debug, Args)]
pub struct BalanceArgs {
    pub account: String,
    #[command(flatten)]
    pub server: ServerArgs,
}
