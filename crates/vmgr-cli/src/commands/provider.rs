// `vmgr provider <id> ...`

use std::fs;

use anyhow::{Context, bail};
use tracing::info;
use vmgr_client::{
    Certificate, EngineClient, ExternalComputeResourcesService, ExternalDiscoveredHostsService,
    ExternalHostGroupsService, ExternalHostProvider, ExternalHostProviderService,
    ExternalHostsService, ExternalProviderCertificatesService, ExternalProviderService,
    provider_inventory,
};

use super::print_json;
use crate::cli::{ProviderCommand, UpdateArgs};

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

pub async fn run(client: &EngineClient, id: &str, command: ProviderCommand) -> anyhow::Result<()> {
    let service = client.external_host_provider(id);

    match command {
        ProviderCommand::Get => {
            let provider = service
                .get()
                .await
                .with_context(|| format!("failed to get provider {id}"))?;
            print_json(&provider.redacted())
        }
        ProviderCommand::Update(args) => {
            let changes = update_payload(&args)?;
            let updated = service
                .update(&changes, args.asynchronous.options())
                .await
                .with_context(|| format!("failed to update provider {id}"))?;
            print_json(&updated.redacted())
        }
        ProviderCommand::Remove(args) => {
            service
                .remove(args.options())
                .await
                .with_context(|| format!("failed to remove provider {id}"))?;
            info!("Provider {} removed", id);
            Ok(())
        }
        ProviderCommand::TestConnectivity(args) => {
            service
                .test_connectivity(args.options())
                .await
                .with_context(|| format!("connectivity test of provider {id} failed"))?;
            info!("Provider {} is reachable", id);
            Ok(())
        }
        ProviderCommand::Certificates => {
            let certificates = service.certificates().list().await?;
            print_json(&certificates)
        }
        ProviderCommand::ImportCertificates { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let certificates = split_pem(&content);
            if certificates.is_empty() {
                bail!("no PEM certificate found in {}", file.display());
            }
            service
                .import_certificates(&certificates)
                .await
                .with_context(|| format!("failed to import certificates into provider {id}"))?;
            info!(
                "Imported {} certificate(s) into provider {}",
                certificates.len(),
                id
            );
            Ok(())
        }
        ProviderCommand::Hosts(args) => {
            print_json(&service.hosts().list(&args.list_options()).await?)
        }
        ProviderCommand::HostGroups(args) => {
            print_json(&service.host_groups().list(&args.list_options()).await?)
        }
        ProviderCommand::ComputeResources(args) => {
            print_json(&service.compute_resources().list(&args.list_options()).await?)
        }
        ProviderCommand::DiscoveredHosts(args) => {
            print_json(&service.discovered_hosts().list(&args.list_options()).await?)
        }
        ProviderCommand::Inventory(args) => {
            let mut inventory = provider_inventory(&service, &args.list_options())
                .await
                .with_context(|| format!("failed to collect inventory of provider {id}"))?;
            inventory.provider = inventory.provider.redacted();
            print_json(&inventory)
        }
    }
}

/// Partial provider carrying only the attributes given on the command line
pub fn update_payload(args: &UpdateArgs) -> anyhow::Result<ExternalHostProvider> {
    let changes = ExternalHostProvider {
        name: args.name.clone(),
        url: args.url.clone(),
        description: args.description.clone(),
        comment: args.comment.clone(),
        ..Default::default()
    };
    if changes == ExternalHostProvider::default() {
        bail!("nothing to update, pass at least one of --name, --url, --description, --comment");
    }
    Ok(changes)
}

/// Split a PEM bundle into its certificates
pub fn split_pem(content: &str) -> Vec<Certificate> {
    content
        .split_inclusive(PEM_END)
        .filter_map(|chunk| {
            let start = chunk.find(PEM_BEGIN)?;
            let block = &chunk[start..];
            block.ends_with(PEM_END).then(|| Certificate::from_pem(block))
        })
        .collect()
}
