//! crm-portal: discover HubSpot portals and write `<name>_api.json` registry files.

use clap::Parser;
use crm_client::HubspotClient;
use crm_portal::{sync_portal, write_shared, PortalConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "crm-portal", version, about = "Write adapter registry files for HubSpot portals")]
struct Cli {
    /// Config file listing portals and the output folder.
    #[arg(long, env = "CRM_PORTAL_CONFIG")]
    config: PathBuf,

    /// Re-discover portals even when a registry file already exists.
    #[arg(long)]
    refresh: bool,

    /// HubSpot API base URL.
    #[arg(long, env = "HUBSPOT_API_BASE", default_value = crm_client::DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::load(&cli.config)?;
    tracing::info!(portals = config.portals.len(), "starting portal discovery");

    let mut registries = Vec::with_capacity(config.portals.len());
    for portal in &config.portals {
        let client = HubspotClient::new(portal.token.trim())
            .with_api_base(cli.api_base.clone())
            .with_timeout(Duration::from_secs(cli.timeout_secs));
        let (registry, outcome) =
            sync_portal(&client, &portal.name, &config.outfolder, cli.refresh).await?;
        tracing::info!(
            portal = %portal.name,
            ?outcome,
            object_types = registry.object_types.len(),
            associations = registry.associations.len(),
            "portal ready"
        );
        registries.push(registry);
    }

    if registries.len() > 1 {
        write_shared(&registries, &config.outfolder).await?;
    }

    tracing::info!("portal discovery complete");
    Ok(())
}
