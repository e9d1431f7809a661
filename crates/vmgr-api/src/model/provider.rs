// External host provider model types

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::{Validate, ValidationError, ValidationErrors};

use super::common::{Link, Property, Resource};
use crate::validation::{check_optional, into_result, validate_http_url, validate_name};

/// An integration point supplying host inventory and discovery data
/// (e.g. a Foreman/Satellite instance).
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalHostProvider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_authentication: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_url: Option<String>,
    #[serde(
        with = "property_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub properties: Vec<Property>,
}

impl Resource for ExternalHostProvider {
    const SINGULAR: &'static str = "external_host_provider";
}

impl ExternalHostProvider {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set credentials and mark the provider as requiring authentication
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.requires_authentication = Some(true);
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn with_authentication_url(mut self, url: impl Into<String>) -> Self {
        self.authentication_url = Some(url.into());
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Look up a property value by name
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
            .and_then(|p| p.value.as_deref())
    }

    /// Copy of this provider with the password removed, for display
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

impl ExternalHostProvider {
    /// Validate a partial payload for `update`.
    ///
    /// Only the fields present are checked; the engine merges them into the
    /// stored provider, which may already hold the credentials.
    pub fn validate_update(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_fields(&mut errors);
        into_result(errors)
    }

    fn check_fields(&self, errors: &mut ValidationErrors) {
        check_optional(errors, "name", self.name.as_deref(), validate_name);
        check_optional(errors, "url", self.url.as_deref(), validate_http_url);
        check_optional(
            errors,
            "authentication_url",
            self.authentication_url.as_deref(),
            validate_http_url,
        );
    }
}

impl Validate for ExternalHostProvider {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_fields(&mut errors);
        if self.requires_authentication == Some(true)
            && self.username.as_deref().is_none_or(str::is_empty)
        {
            errors.add("username", ValidationError::new("username_required"));
        }
        into_result(errors)
    }
}

/// Host known to an external provider
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalHost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_host_provider: Option<Link>,
}

impl Resource for ExternalHost {
    const SINGULAR: &'static str = "external_host";
}

/// Host group defined on an external provider
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalHostGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_host_provider: Option<Link>,
}

impl Resource for ExternalHostGroup {
    const SINGULAR: &'static str = "external_host_group";
}

/// Compute resource (hypervisor or cloud endpoint) registered on a provider
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalComputeResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_host_provider: Option<Link>,
}

impl Resource for ExternalComputeResource {
    const SINGULAR: &'static str = "external_compute_resource";
}

/// Bare-metal host discovered by a provider but not yet provisioned
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalDiscoveredHost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_host_provider: Option<Link>,
}

impl Resource for ExternalDiscoveredHost {
    const SINGULAR: &'static str = "external_discovered_host";
}

/// Certificate of an external provider's TLS chain
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// PEM-encoded certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Resource for Certificate {
    const SINGULAR: &'static str = "certificate";
}

impl Certificate {
    pub fn from_pem(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

// Provider properties are rendered as `{"property": [ ... ]}`
mod property_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::model::common::Property;

    #[derive(Default, Deserialize)]
    #[serde(default)]
    struct Envelope {
        property: Vec<Property>,
    }

    #[derive(Serialize)]
    struct EnvelopeRef<'a> {
        property: &'a [Property],
    }

    pub fn serialize<S: Serializer>(items: &[Property], serializer: S) -> Result<S::Ok, S::Error> {
        EnvelopeRef { property: items }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Property>, D::Error> {
        Ok(Option::<Envelope>::deserialize(deserializer)?
            .unwrap_or_default()
            .property)
    }
}
