// `vmgr providers ...`

use anyhow::Context;
use tracing::info;
use vmgr_client::{EngineClient, ExternalHostProvider, ExternalHostProvidersService};

use super::print_json;
use crate::cli::{AddArgs, ProvidersCommand};

pub async fn run(client: &EngineClient, command: ProvidersCommand) -> anyhow::Result<()> {
    let service = client.external_host_providers();

    match command {
        ProvidersCommand::List(args) => {
            let providers = service
                .list(&args.list_options())
                .await
                .context("failed to list external host providers")?;
            let providers: Vec<ExternalHostProvider> =
                providers.iter().map(ExternalHostProvider::redacted).collect();
            print_json(&providers)
        }
        ProvidersCommand::Add(args) => {
            let provider = new_provider(args);
            let created = service
                .add(&provider)
                .await
                .with_context(|| {
                    format!(
                        "failed to add provider {}",
                        provider.name.as_deref().unwrap_or_default()
                    )
                })?;
            info!(
                "Provider {} registered",
                created.id.as_deref().unwrap_or_default()
            );
            print_json(&created.redacted())
        }
    }
}

/// Provider payload described by `providers add` flags
pub fn new_provider(args: AddArgs) -> ExternalHostProvider {
    let mut provider = ExternalHostProvider::new(args.name, args.url);
    if let Some(description) = args.description {
        provider = provider.with_description(description);
    }
    if let Some(comment) = args.comment {
        provider = provider.with_comment(comment);
    }
    if let (Some(username), Some(password)) = (&args.provider_username, &args.provider_password) {
        provider = provider.with_credentials(username, password);
    }
    if let Some(url) = args.authentication_url {
        provider = provider.with_authentication_url(url);
    }
    provider
}
