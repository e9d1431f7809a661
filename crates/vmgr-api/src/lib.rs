//! vmgr API - model types and service contracts
//!
//! This crate provides:
//! - Data types of the external host provider API (`ExternalHostProvider`,
//!   its sub-resources, `LogicalUnit`) with their JSON wire form
//! - Async service traits describing the remote operations
//! - REST path constants shared by every binding
//! - Input validation utilities

pub mod constants;
pub mod error;
pub mod model;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{ApiError, Result};
pub use model::*;
pub use service::*;
