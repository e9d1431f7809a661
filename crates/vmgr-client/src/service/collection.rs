// Generic HTTP handles for provider sub-collections and their items

use std::{marker::PhantomData, sync::Arc};

use serde_json::Value;
use tracing::debug;
use vmgr_api::{
    Certificate, ExternalComputeResource, ExternalComputeResourceService,
    ExternalComputeResourcesService, ExternalDiscoveredHost, ExternalDiscoveredHostService,
    ExternalDiscoveredHostsService, ExternalHost, ExternalHostGroup, ExternalHostGroupService,
    ExternalHostGroupsService, ExternalHostService, ExternalHostsService,
    ExternalProviderCertificateService, ExternalProviderCertificatesService, ListOptions, Resource,
    Result, decode_collection,
};

use super::path::ResourcePath;
use crate::http::EngineHttpClient;

/// Read-only collection below a provider, e.g. `/externalhostproviders/{id}/hosts`
pub struct HttpCollection<T> {
    http: Arc<EngineHttpClient>,
    path: ResourcePath,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpCollection<T> {
    fn clone(&self) -> Self {
        Self::new(self.http.clone(), self.path.clone())
    }
}

impl<T> HttpCollection<T> {
    pub fn new(http: Arc<EngineHttpClient>, path: ResourcePath) -> Self {
        Self {
            http,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Handle of one item of the collection.
    ///
    /// An id that is not a plain identifier makes every operation on the
    /// handle fail with `ApiError::Validation`.
    pub fn item(&self, id: &str) -> HttpEntity<T> {
        HttpEntity::new(self.http.clone(), self.path.item(id))
    }
}

impl<T: Resource> HttpCollection<T> {
    /// Fetch the items of the collection.
    ///
    /// Sub-collections honour `max` only; the search expression is dropped.
    pub async fn list_items(&self, options: &ListOptions) -> Result<Vec<T>> {
        let query = ListOptions {
            max: options.max,
            search: None,
        };
        let path = self.path.checked()?;
        let body: Value = self.http.get_with_query(path, &query).await?;
        let items = decode_collection(body)?;
        debug!("Listed {} item(s) from {}", items.len(), path);
        Ok(items)
    }
}

/// Single item below a provider, e.g. `/externalhostproviders/{id}/hosts/{host}`
pub struct HttpEntity<T> {
    http: Arc<EngineHttpClient>,
    path: ResourcePath,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpEntity<T> {
    fn clone(&self) -> Self {
        Self::new(self.http.clone(), self.path.clone())
    }
}

impl<T> HttpEntity<T> {
    pub fn new(http: Arc<EngineHttpClient>, path: ResourcePath) -> Self {
        Self {
            http,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

impl<T: Resource> HttpEntity<T> {
    pub async fn fetch(&self) -> Result<T> {
        self.http.get(self.path.checked()?).await
    }
}

macro_rules! impl_collection_service {
    ($collection:ident, $item:ident, $assoc:ident, $accessor:ident, $model:ty) => {
        #[async_trait::async_trait]
        impl $collection for HttpCollection<$model> {
            type $assoc = HttpEntity<$model>;

            async fn list(&self, options: &ListOptions) -> Result<Vec<$model>> {
                self.list_items(options).await
            }

            fn $accessor(&self, id: &str) -> HttpEntity<$model> {
                self.item(id)
            }
        }

        #[async_trait::async_trait]
        impl $item for HttpEntity<$model> {
            async fn get(&self) -> Result<$model> {
                self.fetch().await
            }
        }
    };
}

impl_collection_service!(
    ExternalHostsService,
    ExternalHostService,
    Host,
    host,
    ExternalHost
);
impl_collection_service!(
    ExternalHostGroupsService,
    ExternalHostGroupService,
    HostGroup,
    group,
    ExternalHostGroup
);
impl_collection_service!(
    ExternalComputeResourcesService,
    ExternalComputeResourceService,
    ComputeResource,
    resource,
    ExternalComputeResource
);
impl_collection_service!(
    ExternalDiscoveredHostsService,
    ExternalDiscoveredHostService,
    DiscoveredHost,
    host,
    ExternalDiscoveredHost
);

#[async_trait::async_trait]
impl ExternalProviderCertificatesService for HttpCollection<Certificate> {
    type Certificate = HttpEntity<Certificate>;

    async fn list(&self) -> Result<Vec<Certificate>> {
        self.list_items(&ListOptions::default()).await
    }

    fn certificate(&self, id: &str) -> HttpEntity<Certificate> {
        self.item(id)
    }
}

#[async_trait::async_trait]
impl ExternalProviderCertificateService for HttpEntity<Certificate> {
    async fn get(&self) -> Result<Certificate> {
        self.fetch().await
    }
}
