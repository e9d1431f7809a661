//! HTTP client with SSO authentication, retries, and failover
//!
//! This module provides the transport shared by every service handle: it
//! resolves resource paths against the current engine, attaches the bearer
//! token, and turns engine faults into `ApiError`s.

use std::{
    sync::RwLock,
    time::{Duration, Instant},
};

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use vmgr_api::{
    Action, ApiError, Fault, Result,
    constants::{api_path, header as api_header, sso},
};

use crate::config::ClientConfig;

/// Token info for authentication
#[derive(Clone, Debug)]
struct TokenInfo {
    access_token: String,
    refresh_at: Instant,
}

/// Token endpoint response
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Engine HTTP client with authentication and failover support
pub struct EngineHttpClient {
    client: Client,
    config: ClientConfig,
    current_server_index: RwLock<usize>,
    token: RwLock<Option<TokenInfo>>,
    // Held while logging in so concurrent requests share one SSO round trip
    auth_lock: Mutex<()>,
}

impl EngineHttpClient {
    /// Create a new HTTP client
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let instance = Self::new_without_auth(config)?;

        // Authentication failures are not fatal here; ensure_token() retries
        // on the first request.
        if instance.config.has_credentials() {
            if let Err(e) = instance.authenticate().await {
                warn!("Initial authentication failed (will retry on demand): {}", e);
            }
        }

        Ok(instance)
    }

    /// Create a client without initial authentication
    pub fn new_without_auth(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(ApiError::transport)?;

        Ok(Self {
            client,
            config,
            current_server_index: RwLock::new(0),
            token: RwLock::new(None),
            auth_lock: Mutex::new(()),
        })
    }

    /// Create a client with a token obtained elsewhere, bypassing SSO login
    pub fn new_with_token(config: ClientConfig, token: String, ttl_seconds: i64) -> Result<Self> {
        let instance = Self::new_without_auth(config)?;
        instance.set_token(token, ttl_seconds);
        Ok(instance)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the current server URL
    fn current_server(&self) -> String {
        let index = *self
            .current_server_index
            .read()
            .unwrap_or_else(|e| e.into_inner());
        self.config.server_addrs[index].clone()
    }

    /// Switch to the next server (for failover)
    fn switch_to_next_server(&self) {
        let mut index = self
            .current_server_index
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *index = (*index + 1) % self.config.server_addrs.len();
        debug!("Switched to server index: {}", *index);
    }

    /// Base URL of the current server including the context path
    fn base_url(&self) -> String {
        let server = self.current_server();
        let server = server.trim_end_matches('/');
        let context_path = self.config.context_path.trim_matches('/');

        if context_path.is_empty() {
            server.to_string()
        } else {
            format!("{}/{}", server, context_path)
        }
    }

    /// Build full URL of an API resource path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url(), api_path::API_ROOT, path)
    }

    fn sso_url(&self) -> String {
        format!("{}{}", self.base_url(), api_path::SSO_TOKEN)
    }

    /// Get the current access token if it is not due for refresh
    fn get_token(&self) -> Option<String> {
        let token_guard = self.token.read().unwrap_or_else(|e| e.into_inner());
        token_guard
            .as_ref()
            .filter(|t| Instant::now() < t.refresh_at)
            .map(|t| t.access_token.clone())
    }

    /// Set the access token; it is refreshed up to 5 minutes before expiry.
    ///
    /// Lifetimes above `sso::MAX_TOKEN_TTL_SECS` are capped.
    fn set_token(&self, access_token: String, ttl_seconds: i64) {
        let ttl = ttl_seconds.clamp(0, sso::MAX_TOKEN_TTL_SECS).unsigned_abs();
        let margin = (ttl / 2).min(300);
        let now = Instant::now();
        let refresh_at = now
            .checked_add(Duration::from_secs(ttl - margin))
            .unwrap_or(now);

        let mut token_guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *token_guard = Some(TokenInfo {
            access_token,
            refresh_at,
        });
    }

    fn clear_token(&self) {
        let mut token_guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *token_guard = None;
    }

    /// Authenticate against the engine SSO service
    pub async fn authenticate(&self) -> Result<()> {
        let url = self.sso_url();

        debug!("Authenticating with server: {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, api_header::ACCEPT_JSON)
            .form(&[
                ("grant_type", sso::GRANT_TYPE_PASSWORD),
                ("scope", sso::SCOPE),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await
            .map_err(ApiError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        let token: TokenResponse = serde_json::from_str(&body).unwrap_or_default();

        match token.access_token {
            Some(access_token) if status.is_success() => {
                let ttl = token.expires_in.unwrap_or(sso::DEFAULT_TOKEN_TTL_SECS);
                self.set_token(access_token, ttl);
                debug!(
                    "Authentication successful, token expires in {} seconds",
                    ttl
                );
                Ok(())
            }
            _ => {
                let reason = token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| format!("token endpoint returned {}", status));
                Err(ApiError::AuthFailed(reason))
            }
        }
    }

    /// Ensure we have a valid token, refreshing if needed
    async fn ensure_token(&self) -> Result<Option<String>> {
        if !self.config.has_credentials() {
            return Ok(None);
        }
        if let Some(token) = self.get_token() {
            return Ok(Some(token));
        }

        let _guard = self.auth_lock.lock().await;
        // Another request may have logged in while we waited
        if let Some(token) = self.get_token() {
            return Ok(Some(token));
        }
        self.authenticate().await?;

        self.get_token()
            .map(Some)
            .ok_or_else(|| ApiError::AuthFailed("no token after authentication".to_string()))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self
            .request_with_retry(|client, url| client.get(url), path)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let body = self
            .request_with_retry(|client, url| client.get(url).query(query), path)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Make a POST request with JSON body
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = self
            .request_with_retry(|client, url| client.post(url).json(body), path)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Make a PUT request with JSON body and query parameters.
    ///
    /// Returns `None` when the engine answers without a body, which it may do
    /// for asynchronous updates.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        query: &Q,
    ) -> Result<Option<T>> {
        let body = self
            .request_with_retry(|client, url| client.put(url).query(query).json(body), path)
            .await?;
        decode_optional(&body)
    }

    /// Make a DELETE request with query parameters
    pub async fn delete_with_query<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<()> {
        self.request_with_retry(|client, url| client.delete(url).query(query), path)
            .await?;
        Ok(())
    }

    /// Invoke a resource action and return the engine's action report
    pub async fn post_action(&self, path: &str, action: &Action) -> Result<Action> {
        let body = self
            .request_with_retry(|client, url| client.post(url).json(action), path)
            .await?;
        Ok(decode_optional(&body)?.unwrap_or_default())
    }

    fn decorate(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let builder = builder
            .header(header::ACCEPT, api_header::ACCEPT_JSON)
            .header(api_header::VERSION, api_header::API_VERSION);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Generic request with retry logic.
    ///
    /// Transport errors fail over to the next server; a `401` triggers one
    /// re-authentication. Returns the response body of a successful request.
    async fn request_with_retry<F>(&self, request_fn: F, path: &str) -> Result<String>
    where
        F: Fn(&Client, String) -> RequestBuilder,
    {
        let max_failures = self.config.server_addrs.len();
        let mut failures = 0;
        let mut reauthenticated = false;

        while failures < max_failures {
            let token = match self.ensure_token().await {
                Ok(token) => token,
                Err(ApiError::Transport(e)) => {
                    warn!("Authentication request failed: {}, switching to next server", e);
                    self.switch_to_next_server();
                    failures += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let url = self.build_url(path);
            debug!("Sending request to {}", url);

            let request = self.decorate(request_fn(&self.client, url), token.as_deref());
            match request.send().await {
                Ok(response) => {
                    if response.status() == StatusCode::UNAUTHORIZED
                        && token.is_some()
                        && !reauthenticated
                    {
                        warn!("Token rejected, re-authenticating...");
                        reauthenticated = true;
                        self.clear_token();
                        continue;
                    }
                    return self
                        .handle_response(path, response, token.is_some())
                        .await;
                }
                Err(e) => {
                    warn!("Request failed: {}, switching to next server", e);
                    self.switch_to_next_server();
                    failures += 1;
                }
            }
        }

        error!("Request to {} failed on all {} server(s)", path, max_failures);
        Err(ApiError::AllServersFailed)
    }

    /// Handle response and map engine faults
    async fn handle_response(
        &self,
        path: &str,
        response: Response,
        authenticated: bool,
    ) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;

        if status.is_success() {
            return Ok(body);
        }

        error!("Request to {} failed with status {}: {}", path, status, body);

        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string())),
            StatusCode::UNAUTHORIZED if authenticated => Err(ApiError::AuthFailed(format!(
                "request to {} rejected after re-authentication",
                path
            ))),
            StatusCode::UNAUTHORIZED => Err(ApiError::AuthFailed(format!(
                "request to {} requires authentication but no credentials are configured",
                path
            ))),
            _ => {
                let fault: Fault = serde_json::from_str(&body).unwrap_or_default();
                Err(ApiError::Fault {
                    status: status.as_u16(),
                    reason: if fault.reason.is_empty() {
                        status.canonical_reason().unwrap_or("").to_string()
                    } else {
                        fault.reason
                    },
                    detail: if fault.detail.is_empty() {
                        body
                    } else {
                        fault.detail
                    },
                })
            }
        }
    }
}

fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_default_context() {
        let config = ClientConfig::new("https://engine.example.com");
        let client = EngineHttpClient::new_without_auth(config).unwrap();

        assert_eq!(
            client.build_url("/externalhostproviders"),
            "https://engine.example.com/ovirt-engine/api/externalhostproviders"
        );
        assert_eq!(
            client.sso_url(),
            "https://engine.example.com/ovirt-engine/sso/oauth/token"
        );
    }

    #[test]
    fn test_build_url_trims_slashes() {
        let config = ClientConfig::new("https://engine.example.com/").with_context_path("/engine/");
        let client = EngineHttpClient::new_without_auth(config).unwrap();

        assert_eq!(
            client.build_url("/externalhostproviders/1"),
            "https://engine.example.com/engine/api/externalhostproviders/1"
        );
    }

    #[test]
    fn test_build_url_without_context() {
        let config = ClientConfig::new("http://localhost:8080").with_context_path("");
        let client = EngineHttpClient::new_without_auth(config).unwrap();

        assert_eq!(
            client.build_url("/externalhostproviders"),
            "http://localhost:8080/api/externalhostproviders"
        );
    }

    #[test]
    fn test_switch_to_next_server_wraps() {
        let config = ClientConfig::with_servers(vec![
            "https://engine1.example.com".to_string(),
            "https://engine2.example.com".to_string(),
        ]);
        let client = EngineHttpClient::new_without_auth(config).unwrap();

        assert_eq!(client.current_server(), "https://engine1.example.com");
        client.switch_to_next_server();
        assert_eq!(client.current_server(), "https://engine2.example.com");
        client.switch_to_next_server();
        assert_eq!(client.current_server(), "https://engine1.example.com");
    }

    #[test]
    fn test_token_lifecycle() {
        let config = ClientConfig::new("https://engine.example.com");
        let client = EngineHttpClient::new_with_token(config, "abc".to_string(), 3600).unwrap();
        assert_eq!(client.get_token().as_deref(), Some("abc"));

        client.clear_token();
        assert!(client.get_token().is_none());

        // Expired or non-positive lifetimes are never served
        client.set_token("old".to_string(), 0);
        assert!(client.get_token().is_none());
        client.set_token("neg".to_string(), -5);
        assert!(client.get_token().is_none());
    }

    #[test]
    fn test_huge_token_lifetime_is_capped() {
        let config = ClientConfig::new("https://engine.example.com");
        let client =
            EngineHttpClient::new_with_token(config, "forever".to_string(), i64::MAX).unwrap();
        assert_eq!(client.get_token().as_deref(), Some("forever"));

        client.set_token("big".to_string(), sso::MAX_TOKEN_TTL_SECS + 1);
        assert_eq!(client.get_token().as_deref(), Some("big"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EngineHttpClient::new_without_auth(ClientConfig::with_servers(Vec::new()));
        assert!(matches!(result, Err(ApiError::InvalidConfig(_))));
    }

    #[test]
    fn test_token_response_decoding() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","expires_in":"7200","token_type":"bearer"}"#)
                .unwrap();
        assert_eq!(token.access_token.as_deref(), Some("t"));
        assert_eq!(token.expires_in, Some(7200));

        let token: TokenResponse = serde_json::from_str(
            r#"{"error":"access_denied","error_description":"Cannot authenticate user"}"#,
        )
        .unwrap();
        assert!(token.access_token.is_none());
        assert_eq!(token.error_description.as_deref(), Some("Cannot authenticate user"));
    }

    #[test]
    fn test_decode_optional() {
        assert_eq!(decode_optional::<u32>("").unwrap(), None);
        assert_eq!(decode_optional::<u32>("  \n").unwrap(), None);
        assert_eq!(decode_optional::<u32>("7").unwrap(), Some(7));
        assert!(decode_optional::<u32>("x").is_err());
    }
}
