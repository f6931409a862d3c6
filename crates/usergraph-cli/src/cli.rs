use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "usergraph",
    about = "Users and their connections over a versioned object store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file (bind address and store settings)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Object store collection URL, overriding the config file
    #[arg(long, global = true)]
    pub store_url: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create, show, or rename users
    User(UserArgs),
    /// Connect two users in both directions
    Connect(ConnectArgs),
    /// Add a single direction of a connection
    Link(LinkArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
    /// Serve from a process-local store instead of the remote one
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    Create { name: String },
    Show { id: String },
    Rename { id: String, name: String },
    Connections { id: String },
}

#[derive(Args)]
pub struct ConnectArgs {
    pub a: String,
    pub b: String,
}

#[derive(Args)]
pub struct LinkArgs {
    pub from: String,
    pub to: String,
}
