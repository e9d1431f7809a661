// Common model types shared by every resource

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A resource type with its own collection envelope on the wire.
///
/// The engine wraps collections in an object keyed by the singular type
/// name, e.g. `{"external_host": [ ... ]}`.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Key of the collection envelope
    const SINGULAR: &'static str;
}

/// Reference to another resource by identifier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Link {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            href: None,
        }
    }
}

/// Free-form name/value pair
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// Error body returned by the engine on a failed request
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fault {
    pub reason: String,
    pub detail: String,
}

/// Request body of a resource action such as `testconnectivity`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub asynchronous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<Value>,
    /// Completion status reported back by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Decode a collection body into its items.
///
/// Accepts the enveloped form, a bare array, `null` and `{}` (an empty
/// collection, which the engine renders without the key).
pub fn decode_collection<T: Resource>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove(T::SINGULAR) {
            Some(items) => decode_items(items),
            None => Ok(Vec::new()),
        },
        other => decode_items(other),
    }
}

fn decode_items<T: DeserializeOwned>(items: Value) -> Result<Vec<T>, serde_json::Error> {
    match items {
        Value::Array(_) => serde_json::from_value(items),
        // A single-element collection may be rendered without the array
        Value::Object(_) => Ok(vec![serde_json::from_value(items)?]),
        other => serde_json::from_value(other),
    }
}

/// Encode items in the enveloped collection form
pub fn encode_collection<T: Resource>(items: &[T]) -> Result<Value, serde_json::Error> {
    let mut map = serde_json::Map::new();
    map.insert(T::SINGULAR.to_string(), serde_json::to_value(items)?);
    Ok(Value::Object(map))
}
