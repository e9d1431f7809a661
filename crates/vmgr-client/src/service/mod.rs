// HTTP implementations of the vmgr service contracts

pub mod collection;
pub mod path;
pub mod provider;

pub use collection::{HttpCollection, HttpEntity};
pub use path::ResourcePath;
pub use provider::{HttpExternalHostProviderService, HttpExternalHostProvidersService};
