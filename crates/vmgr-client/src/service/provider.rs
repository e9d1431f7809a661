// HTTP bindings of the external host provider services

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use validator::Validate;
use vmgr_api::{
    Action, AsyncOptions, Certificate, ExternalComputeResource, ExternalDiscoveredHost,
    ExternalHost, ExternalHostGroup, ExternalHostProvider, ExternalHostProviderService,
    ExternalHostProvidersService, ExternalProviderService, ListOptions, Result,
    constants::api_path, decode_collection, encode_collection,
};

use super::{collection::HttpCollection, path::ResourcePath};
use crate::http::EngineHttpClient;

/// The `/externalhostproviders` collection
#[derive(Clone)]
pub struct HttpExternalHostProvidersService {
    http: Arc<EngineHttpClient>,
    path: ResourcePath,
}

impl HttpExternalHostProvidersService {
    pub fn new(http: Arc<EngineHttpClient>) -> Self {
        Self {
            http,
            path: ResourcePath::root(api_path::EXTERNAL_HOST_PROVIDERS),
        }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

#[async_trait::async_trait]
impl ExternalHostProvidersService for HttpExternalHostProvidersService {
    type Provider = HttpExternalHostProviderService;

    async fn list(&self, options: &ListOptions) -> Result<Vec<ExternalHostProvider>> {
        let body: Value = self.http.get_with_query(self.path.as_str(), options).await?;
        Ok(decode_collection(body)?)
    }

    async fn add(&self, provider: &ExternalHostProvider) -> Result<ExternalHostProvider> {
        provider.validate()?;
        let created: ExternalHostProvider =
            self.http.post_json(self.path.as_str(), provider).await?;
        info!(
            "Added external host provider {}",
            created.id.as_deref().unwrap_or("<unknown>")
        );
        Ok(created)
    }

    /// Handle of one provider.
    ///
    /// An id that is not a plain identifier makes every operation on the
    /// handle and its children fail with `ApiError::Validation`.
    fn provider(&self, id: &str) -> HttpExternalHostProviderService {
        HttpExternalHostProviderService::new(self.http.clone(), self.path.item(id))
    }
}

/// A single provider, `/externalhostproviders/{id}`
#[derive(Clone)]
pub struct HttpExternalHostProviderService {
    http: Arc<EngineHttpClient>,
    path: ResourcePath,
}

impl HttpExternalHostProviderService {
    pub fn new(http: Arc<EngineHttpClient>, path: ResourcePath) -> Self {
        Self { http, path }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    fn child<T>(&self, segment: &str) -> HttpCollection<T> {
        HttpCollection::new(self.http.clone(), self.path.child(segment))
    }

    async fn action(&self, name: &str, action: &Action) -> Result<Action> {
        let path = self.path.child(name);
        let report = self.http.post_action(path.checked()?, action).await?;
        debug!(
            "Action {} on {} finished with status {:?}",
            name,
            self.path.as_str(),
            report.status
        );
        Ok(report)
    }
}

#[async_trait::async_trait]
impl ExternalProviderService for HttpExternalHostProviderService {
    type Certificates = HttpCollection<Certificate>;

    async fn import_certificates(&self, certificates: &[Certificate]) -> Result<()> {
        let action = Action {
            certificates: Some(encode_collection(certificates)?),
            ..Default::default()
        };
        self.action(api_path::ACTION_IMPORT_CERTIFICATES, &action)
            .await?;
        Ok(())
    }

    async fn test_connectivity(&self, options: AsyncOptions) -> Result<()> {
        let action = Action {
            asynchronous: options.asynchronous,
            ..Default::default()
        };
        self.action(api_path::ACTION_TEST_CONNECTIVITY, &action)
            .await?;
        Ok(())
    }

    fn certificates(&self) -> HttpCollection<Certificate> {
        self.child(api_path::CERTIFICATES)
    }
}

#[async_trait::async_trait]
impl ExternalHostProviderService for HttpExternalHostProviderService {
    type ComputeResources = HttpCollection<ExternalComputeResource>;
    type DiscoveredHosts = HttpCollection<ExternalDiscoveredHost>;
    type HostGroups = HttpCollection<ExternalHostGroup>;
    type Hosts = HttpCollection<ExternalHost>;

    async fn get(&self) -> Result<ExternalHostProvider> {
        self.http.get(self.path.checked()?).await
    }

    async fn update(
        &self,
        provider: &ExternalHostProvider,
        options: AsyncOptions,
    ) -> Result<ExternalHostProvider> {
        let path = self.path.checked()?;
        provider.validate_update()?;
        let updated: Option<ExternalHostProvider> =
            self.http.put_json(path, provider, &options).await?;
        info!(
            "Updated external host provider {} (async: {:?})",
            path, options.asynchronous
        );
        // An asynchronous update may be acknowledged without a body
        Ok(updated.unwrap_or_else(|| provider.clone()))
    }

    async fn remove(&self, options: AsyncOptions) -> Result<()> {
        let path = self.path.checked()?;
        self.http.delete_with_query(path, &options).await?;
        info!(
            "Removed external host provider {} (async: {:?})",
            path, options.asynchronous
        );
        Ok(())
    }

    fn compute_resources(&self) -> HttpCollection<ExternalComputeResource> {
        self.child(api_path::COMPUTE_RESOURCES)
    }

    fn discovered_hosts(&self) -> HttpCollection<ExternalDiscoveredHost> {
        self.child(api_path::DISCOVERED_HOSTS)
    }

    fn host_groups(&self) -> HttpCollection<ExternalHostGroup> {
        self.child(api_path::HOST_GROUPS)
    }

    fn hosts(&self) -> HttpCollection<ExternalHost> {
        self.child(api_path::HOSTS)
    }
}
