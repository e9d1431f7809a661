// Model types of the external host provider API

pub mod common;
pub mod provider;
pub mod storage;

pub use common::{Action, Fault, Link, Property, Resource, decode_collection, encode_collection};
pub use provider::{
    Certificate, ExternalComputeResource, ExternalDiscoveredHost, ExternalHost,
    ExternalHostGroup, ExternalHostProvider,
};
pub use storage::{LogicalUnit, LunStatus};
