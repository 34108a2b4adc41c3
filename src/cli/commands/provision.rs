use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::{utils, OutputFormat};
use crate::discovery;
use crate::gateway::{GatewayPlan, PublishOrchestrator, RemoteBackend};

#[derive(Args, Debug)]
pub struct ProvisionArgs {
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

    #[arg(long, help = "Deployment region (overrides the discovered region)")]
    pub region: Option<String>,
}

pub async fn handle(args: ProvisionArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = crate::config::config();

    let api_name = args.api_name.unwrap_or_else(|| config.api.name.clone());
    let stage = args.stage.unwrap_or_else(|| config.api.stage.clone());
    let environment = args
        .environment
        .unwrap_or_else(|| config.api.environment.clone());

    let store = utils::open_store(config)?;
    let target = discovery::discover_backend(store.as_ref(), &environment).await?;
    let region = args
        .region
        .or_else(|| config.api.region.clone())
        .unwrap_or_else(|| target.region.clone());

    let table = utils::load_endpoints(args.endpoints.as_deref(), &target.address)?;
    let plan = GatewayPlan::build(&api_name, &stage, &table)?;

    let backend_url = config.backend.base_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("TOWNGATE_BACKEND_URL must point at the provisioning backend")
    })?;
    let backend = RemoteBackend::new(backend_url, config.backend.access_token.clone())?;

    let orchestrator = PublishOrchestrator::new(backend, region);
    let outcome = orchestrator.publish(&plan).await?;

    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": true,
                "invoke_url": outcome.invoke_url,
                "api_id": outcome.api_id,
                "routes": outcome.routes,
                "bindings": outcome.bindings,
                "grants": outcome.grants,
                "deployment": outcome.deployment,
                "activation_token": outcome.activation_token,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!(
                "✓ Published {} ({} routes, {} bindings, {} grants)",
                api_name,
                outcome.routes.len(),
                outcome.bindings.len(),
                outcome.grants.len()
            );
            println!("Gateway created at: {}", outcome.invoke_url);
        }
    }

    Ok(())
}
