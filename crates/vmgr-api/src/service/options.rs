// Per-call options of service operations

use serde::Serialize;

/// Options of a mutating operation (`update`, `remove`, actions).
///
/// `asynchronous` is forwarded to the engine as the `async` parameter only
/// when set; `Some(true)` asks the engine to apply the change without waiting
/// for it to complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AsyncOptions {
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub asynchronous: Option<bool>,
}

impl AsyncOptions {
    pub fn new(asynchronous: bool) -> Self {
        Self {
            asynchronous: Some(asynchronous),
        }
    }

    /// Do not wait for completion
    pub fn background() -> Self {
        Self::new(true)
    }

    /// Wait for completion
    pub fn wait() -> Self {
        Self::new(false)
    }

    pub fn is_set(&self) -> bool {
        self.asynchronous.is_some()
    }
}

impl From<bool> for AsyncOptions {
    fn from(asynchronous: bool) -> Self {
        Self::new(asynchronous)
    }
}

/// Options of a collection `list` operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    /// Maximum number of items to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    /// Engine search expression, only honoured by top-level collections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListOptions {
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}
