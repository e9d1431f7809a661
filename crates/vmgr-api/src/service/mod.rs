//! Service contracts of the external host provider API
//!
//! Each trait addresses one remote resource. Child resources are reached
//! through handle accessors (`hosts()`, `certificates()`, ...) that are cheap
//! and perform no I/O; only the `async fn` operations talk to the engine.

pub mod options;

pub use options::{AsyncOptions, ListOptions};

use serde::Serialize;

use crate::error::Result;
use crate::model::{
    Certificate, ExternalComputeResource, ExternalDiscoveredHost, ExternalHost,
    ExternalHostGroup, ExternalHostProvider,
};

/// Operations shared by every kind of external provider
#[async_trait::async_trait]
pub trait ExternalProviderService: Send + Sync {
    type Certificates: ExternalProviderCertificatesService;

    /// Trust the given certificate chain for connections to the provider
    async fn import_certificates(&self, certificates: &[Certificate]) -> Result<()>;

    /// Ask the engine to probe the provider
    async fn test_connectivity(&self, options: AsyncOptions) -> Result<()>;

    /// Certificate chain presented by the provider
    fn certificates(&self) -> Self::Certificates;
}

#[async_trait::async_trait]
pub trait ExternalProviderCertificatesService: Send + Sync {
    type Certificate: ExternalProviderCertificateService;

    async fn list(&self) -> Result<Vec<Certificate>>;

    fn certificate(&self, id: &str) -> Self::Certificate;
}

#[async_trait::async_trait]
pub trait ExternalProviderCertificateService: Send + Sync {
    async fn get(&self) -> Result<Certificate>;
}

/// A single external host provider
#[async_trait::async_trait]
pub trait ExternalHostProviderService: ExternalProviderService {
    type ComputeResources: ExternalComputeResourcesService;
    type DiscoveredHosts: ExternalDiscoveredHostsService;
    type HostGroups: ExternalHostGroupsService;
    type Hosts: ExternalHostsService;

    async fn get(&self) -> Result<ExternalHostProvider>;

    /// Apply `provider` to the remote resource and return its new state
    async fn update(
        &self,
        provider: &ExternalHostProvider,
        options: AsyncOptions,
    ) -> Result<ExternalHostProvider>;

    async fn remove(&self, options: AsyncOptions) -> Result<()>;

    fn compute_resources(&self) -> Self::ComputeResources;

    fn discovered_hosts(&self) -> Self::DiscoveredHosts;

    fn host_groups(&self) -> Self::HostGroups;

    fn hosts(&self) -> Self::Hosts;
}

/// The collection of external host providers
#[async_trait::async_trait]
pub trait ExternalHostProvidersService: Send + Sync {
    type Provider: ExternalHostProviderService;

    async fn list(&self, options: &ListOptions) -> Result<Vec<ExternalHostProvider>>;

    async fn add(&self, provider: &ExternalHostProvider) -> Result<ExternalHostProvider>;

    fn provider(&self, id: &str) -> Self::Provider;
}

#[async_trait::async_trait]
pub trait ExternalComputeResourcesService: Send + Sync {
    type ComputeResource: ExternalComputeResourceService;

    async fn list(&self, options: &ListOptions) -> Result<Vec<ExternalComputeResource>>;

    fn resource(&self, id: &str) -> Self::ComputeResource;
}

#[async_trait::async_trait]
pub trait ExternalComputeResourceService: Send + Sync {
    async fn get(&self) -> Result<ExternalComputeResource>;
}

#[async_trait::async_trait]
pub trait ExternalDiscoveredHostsService: Send + Sync {
    type DiscoveredHost: ExternalDiscoveredHostService;

    async fn list(&self, options: &ListOptions) -> Result<Vec<ExternalDiscoveredHost>>;

    fn host(&self, id: &str) -> Self::DiscoveredHost;
}

#[async_trait::async_trait]
pub trait ExternalDiscoveredHostService: Send + Sync {
    async fn get(&self) -> Result<ExternalDiscoveredHost>;
}

#[async_trait::async_trait]
pub trait ExternalHostGroupsService: Send + Sync {
    type HostGroup: ExternalHostGroupService;

    async fn list(&self, options: &ListOptions) -> Result<Vec<ExternalHostGroup>>;

    fn group(&self, id: &str) -> Self::HostGroup;
}

#[async_trait::async_trait]
pub trait ExternalHostGroupService: Send + Sync {
    async fn get(&self) -> Result<ExternalHostGroup>;
}

#[async_trait::async_trait]
pub trait ExternalHostsService: Send + Sync {
    type Host: ExternalHostService;

    async fn list(&self, options: &ListOptions) -> Result<Vec<ExternalHost>>;

    fn host(&self, id: &str) -> Self::Host;
}

#[async_trait::async_trait]
pub trait ExternalHostService: Send + Sync {
    async fn get(&self) -> Result<ExternalHost>;
}

/// A provider together with everything its four sub-collections hold
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProviderInventory {
    pub provider: ExternalHostProvider,
    pub hosts: Vec<ExternalHost>,
    pub host_groups: Vec<ExternalHostGroup>,
    pub compute_resources: Vec<ExternalComputeResource>,
    pub discovered_hosts: Vec<ExternalDiscoveredHost>,
}

/// Fetch a provider and its sub-collections concurrently
pub async fn provider_inventory<S>(service: &S, options: &ListOptions) -> Result<ProviderInventory>
where
    S: ExternalHostProviderService,
{
    let hosts_service = service.hosts();
    let groups_service = service.host_groups();
    let compute_service = service.compute_resources();
    let discovered_service = service.discovered_hosts();

    let (provider, hosts, host_groups, compute_resources, discovered_hosts) = futures::try_join!(
        service.get(),
        hosts_service.list(options),
        groups_service.list(options),
        compute_service.list(options),
        discovered_service.list(options),
    )?;

    Ok(ProviderInventory {
        provider,
        hosts,
        host_groups,
        compute_resources,
        discovered_hosts,
    })
}
