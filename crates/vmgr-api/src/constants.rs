// REST path constants for the engine API

pub mod api_path {
    // Prefix of every API resource, below the context path
    pub const API_ROOT: &str = "/api";

    // External host providers
    pub const EXTERNAL_HOST_PROVIDERS: &str = "/externalhostproviders";

    // Provider sub-resources
    pub const CERTIFICATES: &str = "certificates";
    pub const COMPUTE_RESOURCES: &str = "computeresources";
    pub const DISCOVERED_HOSTS: &str = "discoveredhosts";
    pub const HOST_GROUPS: &str = "hostgroups";
    pub const HOSTS: &str = "hosts";

    // Provider actions
    pub const ACTION_IMPORT_CERTIFICATES: &str = "importcertificates";
    pub const ACTION_TEST_CONNECTIVITY: &str = "testconnectivity";

    // SSO token endpoint, below the context path
    pub const SSO_TOKEN: &str = "/sso/oauth/token";
}

pub mod header {
    pub const VERSION: &str = "Version";
    pub const API_VERSION: &str = "4";
    pub const ACCEPT_JSON: &str = "application/json";
}

pub mod sso {
    pub const GRANT_TYPE_PASSWORD: &str = "password";
    pub const SCOPE: &str = "ovirt-app-api";
    /// Token lifetime assumed when the SSO response carries none
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 18000;
    /// Upper bound applied to token lifetimes reported by the server
    pub const MAX_TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;
}

/// Join a parent resource path and a child segment
pub fn join(parent: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        parent.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}
