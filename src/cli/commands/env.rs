use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::discovery;

#[derive(Subcommand)]
pub enum EnvCommands {
    #[command(about = "Show the stored document for an environment")]
    Show {
        #[arg(help = "Environment name (defaults to the configured environment)")]
        name: Option<String>,
    },

    #[command(about = "Record the backend invocation address for an environment")]
    Sync {
        #[arg(help = "Environment name (defaults to the configured environment)")]
        name: Option<String>,

        #[arg(long, help = "Backend invocation address to record")]
        address: String,

        #[arg(long, help = "Also record the deployment region")]
        region: Option<String>,
    },
}

pub async fn handle(cmd: EnvCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = crate::config::config();
    let store = utils::open_store(config)?;

    match cmd {
        EnvCommands::Show { name } => {
            let environment = name.unwrap_or_else(|| config.api.environment.clone());
            let document = store.read(&environment).await?;

            match output_format {
                OutputFormat::Json => {
                    let response = json!({
                        "environment": environment,
                        "document": document,
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Text => match document {
                    Some(document) => {
                        println!("Environment {}:", environment);
                        println!(
                            "  backend address: {}",
                            document.backend_address.as_deref().unwrap_or("(unset)")
                        );
                        println!(
                            "  region:          {}",
                            document.region.as_deref().unwrap_or("(unset)")
                        );
                        if let Some(updated_at) = document.updated_at {
                            println!("  updated at:      {}", updated_at);
                        }
                    }
                    None => println!("Environment {} has no stored document", environment),
                },
            }
            Ok(())
        }

        EnvCommands::Sync {
            name,
            address,
            region,
        } => {
            let environment = name.unwrap_or_else(|| config.api.environment.clone());

            let updated = match region {
                // Region updates always rewrite; address-only syncs skip
                // the write when nothing changed.
                Some(region) => {
                    let mut document = store.read(&environment).await?.unwrap_or_default();
                    document.backend_address = Some(address.clone());
                    document.region = Some(region);
                    document.updated_at = Some(Utc::now());
                    store.write(&environment, &document).await?;
                    true
                }
                None => {
                    discovery::sync_backend_address(store.as_ref(), &environment, &address).await?
                }
            };

            match output_format {
                OutputFormat::Json => {
                    let response = json!({
                        "success": true,
                        "environment": environment,
                        "updated": updated,
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Text => {
                    if updated {
                        println!("✓ Recorded backend address for {}", environment);
                    } else {
                        println!("Backend address for {} already up to date", environment);
                    }
                }
            }
            Ok(())
        }
    }
}
