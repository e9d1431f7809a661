// Storage model types

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::{Validate, ValidationErrors};

use super::common::{Link, Resource};
use crate::validation::{check_optional, into_result, validate_non_negative, validate_port};

/// Status of a logical unit as seen by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LunStatus {
    /// Not used by any storage domain or disk
    Free,
    /// Part of a storage domain or attached as a direct LUN disk
    Used,
    /// Visible but cannot be used, e.g. it holds a foreign partition table
    Unusable,
}

impl std::fmt::Display for LunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LunStatus::Free => write!(f, "free"),
            LunStatus::Used => write!(f, "used"),
            LunStatus::Unusable => write!(f, "unusable"),
        }
    }
}

/// A single storage logical unit exposed by a storage domain.
///
/// Every field is independently optional. The relationship fields refer to
/// other resources by identifier; the logical unit does not own them.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicalUnit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lun_mapping: Option<i32>,
    /// Size in bytes
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_id: Option<String>,
    /// Maximum number of bytes the underlying storage can discard in a
    /// single operation. `0` means discard is not supported.
    ///
    /// This is the software limit (`discard_max_bytes` in the kernel's
    /// `queue-sysfs`), not the hardware one.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discard_max_size: Option<i64>,
    /// True if previously discarded blocks read back as zeros
    /// (`discard_zeroes_data` in `queue-sysfs`).
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discard_zeroes_data: Option<bool>,
}

impl Resource for LogicalUnit {
    const SINGULAR: &'static str = "logical_unit";
}

impl LogicalUnit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Whether the underlying storage supports discard, if known
    pub fn supports_discard(&self) -> Option<bool> {
        self.discard_max_size.map(|max| max > 0)
    }

    /// Discard support that also guarantees zeroed reads afterwards
    pub fn discard_zeroes(&self) -> Option<bool> {
        match (self.supports_discard(), self.discard_zeroes_data) {
            (Some(false), _) => Some(false),
            (Some(true), zeroes) => zeroes,
            (None, _) => None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.status == Some(LunStatus::Free)
    }

    pub fn is_usable(&self) -> bool {
        matches!(self.status, Some(LunStatus::Free | LunStatus::Used))
    }

    pub fn storage_domain_ref(&self) -> Option<Link> {
        self.storage_domain_id.as_deref().map(Link::new)
    }

    pub fn disk_ref(&self) -> Option<Link> {
        self.disk_id.as_deref().map(Link::new)
    }
}

impl Validate for LogicalUnit {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_optional(&mut errors, "port", self.port, validate_port);
        check_optional(&mut errors, "size", self.size, validate_non_negative);
        check_optional(&mut errors, "paths", self.paths.map(i64::from), validate_non_negative);
        check_optional(
            &mut errors,
            "lun_mapping",
            self.lun_mapping.map(i64::from),
            validate_non_negative,
        );
        check_optional(
            &mut errors,
            "discard_max_size",
            self.discard_max_size,
            validate_non_negative,
        );
        into_result(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn iscsi_lun() -> LogicalUnit {
        LogicalUnit {
            id: Some("36001405a8b5e1d1c5a94b5b9c7d3e2f1".to_string()),
            address: Some("10.35.1.20".to_string()),
            port: Some(3260),
            target: Some("iqn.2016-01.com.example:storage".to_string()),
            portal: Some("10.35.1.20:3260,1".to_string()),
            vendor_id: Some("LIO-ORG".to_string()),
            product_id: Some("lun0".to_string()),
            size: Some(107_374_182_400),
            paths: Some(2),
            status: Some(LunStatus::Free),
            discard_max_size: Some(4_194_304),
            discard_zeroes_data: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_logical_unit_serialization() {
        let lun = iscsi_lun();
        let json = serde_json::to_string(&lun).unwrap();
        assert!(json.contains("\"port\":3260"));
        assert!(json.contains("\"vendor_id\":\"LIO-ORG\""));
        assert!(json.contains("\"status\":\"free\""));
        assert!(json.contains("\"discard_max_size\":4194304"));
        // Absent fields are omitted
        assert!(!json.contains("disk_id"));
        assert!(!json.contains("password"));

        let deserialized: LogicalUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, lun);
    }

    #[test]
    fn test_logical_unit_accepts_string_encoded_numbers() {
        let lun: LogicalUnit = serde_json::from_value(json!({
            "id": "lun-1",
            "port": "3260",
            "size": "53687091200",
            "paths": "0",
            "lun_mapping": "1",
            "discard_max_size": "0",
            "discard_zeroes_data": "true",
            "status": "used"
        }))
        .unwrap();

        assert_eq!(lun.port, Some(3260));
        assert_eq!(lun.size, Some(53_687_091_200));
        assert_eq!(lun.paths, Some(0));
        assert_eq!(lun.lun_mapping, Some(1));
        assert_eq!(lun.discard_max_size, Some(0));
        assert_eq!(lun.discard_zeroes_data, Some(true));
        assert_eq!(lun.status, Some(LunStatus::Used));
    }

    #[test]
    fn test_logical_unit_empty_document() {
        let lun: LogicalUnit = serde_json::from_str("{}").unwrap();
        assert_eq!(lun, LogicalUnit::default());
        assert_eq!(serde_json::to_string(&lun).unwrap(), "{}");
    }

    #[test]
    fn test_logical_unit_rejects_garbage_port() {
        assert!(serde_json::from_value::<LogicalUnit>(json!({"port": "iscsi"})).is_err());
    }

    #[test]
    fn test_supports_discard() {
        let mut lun = LogicalUnit::new("lun-1");
        assert_eq!(lun.supports_discard(), None);
        assert_eq!(lun.discard_zeroes(), None);

        lun.discard_max_size = Some(0);
        lun.discard_zeroes_data = Some(true);
        assert_eq!(lun.supports_discard(), Some(false));
        assert_eq!(lun.discard_zeroes(), Some(false));

        lun.discard_max_size = Some(1_048_576);
        assert_eq!(lun.supports_discard(), Some(true));
        assert_eq!(lun.discard_zeroes(), Some(true));

        lun.discard_zeroes_data = None;
        assert_eq!(lun.discard_zeroes(), None);
    }

    #[test]
    fn test_status_queries() {
        let mut lun = iscsi_lun();
        assert!(lun.is_free());
        assert!(lun.is_usable());

        lun.status = Some(LunStatus::Used);
        assert!(!lun.is_free());
        assert!(lun.is_usable());

        lun.status = Some(LunStatus::Unusable);
        assert!(!lun.is_usable());

        lun.status = None;
        assert!(!lun.is_usable());
    }

    #[test]
    fn test_relationship_refs() {
        let mut lun = iscsi_lun();
        assert!(lun.storage_domain_ref().is_none());

        lun.storage_domain_id = Some("sd-1".to_string());
        lun.disk_id = Some("disk-9".to_string());
        assert_eq!(lun.storage_domain_ref(), Some(Link::new("sd-1")));
        assert_eq!(lun.disk_ref(), Some(Link::new("disk-9")));
    }

    #[test]
    fn test_validate() {
        assert!(iscsi_lun().validate().is_ok());
        assert!(LogicalUnit::default().validate().is_ok());

        let lun = LogicalUnit {
            port: Some(70000),
            size: Some(-1),
            discard_max_size: Some(-512),
            ..Default::default()
        };
        let errors = lun.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("port"));
        assert!(fields.contains_key("size"));
        assert!(fields.contains_key("discard_max_size"));
        assert!(!fields.contains_key("paths"));
    }

    #[test]
    fn test_lun_status_display() {
        assert_eq!(LunStatus::Free.to_string(), "free");
        assert_eq!(LunStatus::Unusable.to_string(), "unusable");
        assert_eq!(serde_json::to_string(&LunStatus::Used).unwrap(), "\"used\"");
    }

    proptest! {
        #[test]
        fn prop_size_decodes_from_number_or_string(size in 0i64..i64::MAX) {
            let native: LogicalUnit = serde_json::from_value(json!({"size": size})).unwrap();
            let quoted: LogicalUnit =
                serde_json::from_value(json!({"size": size.to_string()})).unwrap();
            prop_assert_eq!(native.size, Some(size));
            prop_assert_eq!(quoted.size, Some(size));
        }

        #[test]
        fn prop_discard_support_follows_max_size(max in 0i64..=(1i64 << 40)) {
            let lun = LogicalUnit {
                discard_max_size: Some(max),
                ..Default::default()
            };
            prop_assert_eq!(lun.supports_discard(), Some(max != 0));
        }
    }
}
