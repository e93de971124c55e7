//! Cloud Resource Operator Library
//!
//! Core functionality for the operator that materializes connection-detail
//! secrets for `BlobStorage` resources.
//!
//! ## Quick Start
//!
//! ```rust
//! use cloud_resource_operator::prelude::*;
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod runtime;
