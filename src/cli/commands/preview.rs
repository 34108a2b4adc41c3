use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::{utils, OutputFormat};
use crate::discovery;
use crate::gateway::{GatewayPlan, ParentRef};

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[arg(
        long,
        help = "Endpoint declaration file (JSON or YAML); defaults to the built-in town endpoints"
    )]
    pub endpoints: Option<PathBuf>,

    #[arg(long, help = "Human-readable API name")]
    pub api_name: Option<String>,

    #[arg(long, help = "Stage label for the published configuration")]
    pub stage: Option<String>,

    #[arg(long, help = "Environment store entry holding the backend address")]
    pub environment: Option<String>,

    #[arg(
        long,
        help = "Backend invocation address; skips environment store discovery"
    )]
    pub address: Option<String>,
}

pub async fn handle(args: PreviewArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = crate::config::config();

    let api_name = args.api_name.unwrap_or_else(|| config.api.name.clone());
    let stage = args.stage.unwrap_or_else(|| config.api.stage.clone());

    let address = match args.address {
        Some(address) => address,
        None => {
            let environment = args
                .environment
                .unwrap_or_else(|| config.api.environment.clone());
            let store = utils::open_store(config)?;
            discovery::discover_backend(store.as_ref(), &environment)
                .await?
                .address
        }
    };

    let table = utils::load_endpoints(args.endpoints.as_deref(), &address)?;
    let plan = GatewayPlan::build(&api_name, &stage, &table)?;

    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "api": plan.api_operation(),
                "operations": plan.operations(),
                "stage_name": plan.stage_name,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!(
                "Plan for {} ({} routes, {} bindings, {} grants):",
                api_name,
                plan.routes.len(),
                plan.bindings.len(),
                plan.grants.len()
            );
            for route in &plan.routes {
                let parent = match &route.parent {
                    ParentRef::Root => "root".to_string(),
                    ParentRef::Route(id) => id.to_string(),
                };
                println!("  route    /{} (parent: {})", route.full_path, parent);
            }
            for binding in &plan.bindings {
                println!(
                    "  method   {} on {} -> {}",
                    binding.verb, binding.route, binding.backend_address
                );
            }
            for grant in &plan.grants {
                println!("  grant    invoke {}", grant.backend_address);
            }
            println!("Deployment would activate stage {:?}", plan.stage_name);
        }
    }

    Ok(())
}
