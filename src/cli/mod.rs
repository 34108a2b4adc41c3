pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "towngate")]
#[command(about = "Town Gateway CLI - provisions the managed HTTP front end for the town backend")]
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
    #[command(about = "Build the routing graph and publish it atomically")]
    Provision {
        #[command(flatten)]
        args: commands::provision::ProvisionArgs,
    },

    #[command(about = "Build the routing graph and print the operation plan without publishing")]
    Preview {
        #[command(flatten)]
        args: commands::preview::PreviewArgs,
    },

    #[command(about = "Environment store inspection and backend address sync")]
    Env {
        #[command(subcommand)]
        cmd: commands::env::EnvCommands,
    },
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
        Commands::Provision { args } => commands::provision::handle(args, output_format).await,
        Commands::Preview { args } => commands::preview::handle(args, output_format).await,
        Commands::Env { cmd } => commands::env::handle(cmd, output_format).await,
    }
}
