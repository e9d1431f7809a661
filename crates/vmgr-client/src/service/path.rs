// Request paths of service handles

use validator::ValidationErrors;
use vmgr_api::{ApiError, Result, constants::join, validation::validate_resource_id};

/// Request path of a service handle.
///
/// Identifiers are checked when a handle is created. A rejected identifier
/// is carried along to every descendant handle and reported by the first
/// operation, so no request is sent for it.
#[derive(Clone, Debug)]
pub struct ResourcePath {
    path: String,
    invalid: Option<ValidationErrors>,
}

impl ResourcePath {
    /// A fixed path such as `/externalhostproviders`
    pub fn root(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            invalid: None,
        }
    }

    /// Fixed sub-collection below this path, e.g. `hosts`
    pub fn child(&self, segment: &str) -> Self {
        Self {
            path: join(&self.path, segment),
            invalid: self.invalid.clone(),
        }
    }

    /// Item of the collection at this path, addressed by a caller-supplied id
    pub fn item(&self, id: &str) -> Self {
        let mut invalid = self.invalid.clone();
        if let Err(e) = validate_resource_id(id) {
            invalid
                .get_or_insert_with(ValidationErrors::new)
                .add("id", e);
        }
        Self {
            path: join(&self.path, id),
            invalid,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }

    /// The path to request, or the validation failure of an identifier
    pub fn checked(&self) -> Result<&str> {
        match &self.invalid {
            Some(errors) => Err(ApiError::Validation(errors.clone())),
            None => Ok(&self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_item_path() {
        let path = ResourcePath::root("/externalhostproviders")
            .item("123")
            .child("hosts")
            .item("h-1");
        assert_eq!(path.as_str(), "/externalhostproviders/123/hosts/h-1");
        assert_eq!(path.checked().unwrap(), "/externalhostproviders/123/hosts/h-1");
    }

    #[test]
    fn test_rejected_id_is_inherited() {
        let provider = ResourcePath::root("/externalhostproviders").item("123?async=true");
        assert!(!provider.is_valid());

        let host = provider.child("hosts").item("h1");
        assert!(matches!(host.checked(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let path = ResourcePath::root("/externalhostproviders").item("../hosts");
        assert!(matches!(path.checked(), Err(ApiError::Validation(_))));
        assert!(ResourcePath::root("/externalhostproviders").item("").checked().is_err());
    }
}
