pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "desk")]
#[command(about = "Back-office operations CLI: seeding, credentials and diagnostics")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Clear and load collections from a YAML fixture file")]
    Seed(commands::seed::SeedArgs),

    #[command(about = "Print a bcrypt hash for a password")]
    HashPassword(commands::password::HashPasswordArgs),

    #[command(about = "List the registered API resources")]
    Resources,

    #[command(about = "Check a running server's health endpoint")]
    Ping(commands::ping::PingArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
        Commands::Seed(args) => commands::seed::handle(args, output_format).await,
        Commands::HashPassword(args) => commands::password::handle(args, output_format),
        Commands::Resources => commands::resources::handle(output_format),
        Commands::Ping(args) => commands::ping::handle(args, output_format).await,
    }
}
