//! Input validation utilities for the vmgr API
//!
//! Field-level checks return `validator::ValidationError`; the model types
//! combine them into `ValidationErrors` through their `Validate` impls.

use url::Url;
use validator::{ValidationError, ValidationErrors};

/// Maximum length for resource names
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for a resource identifier used in a path
pub const MAX_ID_LENGTH: usize = 128;

/// Validate a TCP port carried as a wire integer
pub fn validate_port(port: i32) -> Result<(), ValidationError> {
    if !(1..=65535).contains(&port) {
        return Err(ValidationError::new("port_out_of_range"));
    }
    Ok(())
}

/// Validate a quantity (bytes, path count, mapping index) that cannot be negative
pub fn validate_non_negative(value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::new("negative_value"));
    }
    Ok(())
}

/// Validate a resource name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name_empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::new("name_too_long"));
    }
    Ok(())
}

/// Validate an absolute http(s) URL
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let url = Url::parse(value).map_err(|_| ValidationError::new("url_invalid"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::new("url_scheme_unsupported"));
    }
    if url.host_str().is_none() {
        return Err(ValidationError::new("url_missing_host"));
    }
    Ok(())
}

/// Validate a resource identifier before it is placed in a request path
pub fn validate_resource_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::new("id_empty"));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(ValidationError::new("id_too_long"));
    }
    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::new("id_invalid_chars"));
    }
    Ok(())
}

/// Record `check` against `field` when the value is present
pub(crate) fn check_optional<T, F>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<T>,
    check: F,
) where
    F: FnOnce(T) -> Result<(), ValidationError>,
{
    if let Some(Err(e)) = value.map(check) {
        errors.add(field, e);
    }
}

/// Convert accumulated errors into a `Validate` result
pub(crate) fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
