// EngineClient - facade over the engine API services

use std::sync::Arc;

use vmgr_api::{ExternalHostProvidersService, Result};

use crate::{
    config::ClientConfig,
    http::EngineHttpClient,
    service::{HttpExternalHostProviderService, HttpExternalHostProvidersService},
};

/// Entry point to the engine API
#[derive(Clone)]
pub struct EngineClient {
    http_client: Arc<EngineHttpClient>,
}

impl EngineClient {
    /// Create a new EngineClient with the given configuration
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let http_client = EngineHttpClient::new(config).await?;
        Ok(Self::from_http_client(http_client))
    }

    /// Create a new EngineClient with a pre-issued SSO token, bypassing login
    pub fn new_with_token(config: ClientConfig, token: String, ttl_seconds: i64) -> Result<Self> {
        let http_client = EngineHttpClient::new_with_token(config, token, ttl_seconds)?;
        Ok(Self::from_http_client(http_client))
    }

    /// Create a new EngineClient from a single server address
    pub async fn from_server_addr(addr: &str, username: &str, password: &str) -> Result<Self> {
        let config = ClientConfig::new(addr).with_auth(username, password);
        Self::new(config).await
    }

    pub fn from_http_client(http_client: EngineHttpClient) -> Self {
        Self {
            http_client: Arc::new(http_client),
        }
    }

    /// Get the underlying HTTP client
    pub fn http_client(&self) -> &Arc<EngineHttpClient> {
        &self.http_client
    }

    /// The `/externalhostproviders` collection
    pub fn external_host_providers(&self) -> HttpExternalHostProvidersService {
        HttpExternalHostProvidersService::new(self.http_client.clone())
    }

    /// A single external host provider
    pub fn external_host_provider(&self, id: &str) -> HttpExternalHostProviderService {
        self.external_host_providers().provider(id)
    }
}
