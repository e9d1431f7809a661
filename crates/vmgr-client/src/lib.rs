//! vmgr Client - Rust SDK for the engine's external host provider API
//!
//! This crate provides:
//! - HTTP client with SSO authentication, retry, and failover
//! - HTTP implementations of the `vmgr-api` service traits
//! - `EngineClient`, the entry point handing out service handles

pub mod client;
pub mod config;
pub mod http;
pub mod service;

pub use client::EngineClient;
pub use config::ClientConfig;
pub use http::EngineHttpClient;
pub use service::{
    HttpCollection, HttpEntity, HttpExternalHostProviderService, HttpExternalHostProvidersService,
    ResourcePath,
};

// The contracts are re-exported so callers need a single dependency
pub use vmgr_api::*;
