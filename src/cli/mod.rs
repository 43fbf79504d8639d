pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront operator CLI - migrations, admin bootstrap and health probes")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Create an administrator account, applying pending migrations first")]
    CreateAdmin {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Last name")]
        nom: String,
        #[arg(long, help = "First name")]
        prenom: String,
        #[arg(long, env = "STOREFRONT_ADMIN_PASSWORD", help = "Password (at least 8 characters)")]
        password: String,
    },

    #[command(about = "Check a running server's /health endpoint")]
    Ping {
        #[arg(long, default_value = "http://localhost:3000", help = "Server base URL")]
        url: String,
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
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::CreateAdmin {
            email,
            nom,
            prenom,
            password,
        } => commands::admin::handle(email, nom, prenom, password, output_format).await,
        Commands::Ping { url } => commands::ping::handle(&url, output_format).await,
    }
}
