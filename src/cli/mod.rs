pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "nova")]
#[command(about = "Nova CLI - operator tools for the NovaProfile HR backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Build the org hierarchy offline from a fixture file")]
    OrgTree(commands::org_tree::OrgTreeArgs),

    #[command(about = "Print an argon2 hash suitable for users.password_hash")]
    HashPassword {
        #[arg(help = "Plain-text password")]
        password: String,
    },

    #[command(about = "Issue an access/refresh token pair with the configured secret")]
    Token {
        #[arg(help = "Subject email")]
        email: String,
    },

    #[command(about = "Check /health and /dbz of a running server")]
    Ping {
        #[arg(long, help = "Server base URL (defaults to NOVA_API_URL or http://localhost:<port>)")]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::OrgTree(args) => commands::org_tree::handle(args, output_format).await,
        Commands::HashPassword { password } => commands::credentials::hash_password(&password, output_format),
        Commands::Token { email } => commands::credentials::token(&email, output_format),
        Commands::Ping { url } => commands::ping::handle(url, output_format).await,
    }
}
