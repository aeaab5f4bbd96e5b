//! # prodata-core
//!
//! Core types and transport for working with the ProData Cloud API.
//!
//! This crate provides the authenticated HTTP transport, response envelope
//! handling, per-call context resolution, and configuration layering shared by
//! the entity crates.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy for API operations
//! - [`client`] - Authenticated HTTP transport and client builder
//! - [`envelope`] - The `{success, data, errors}` response wrapper
//! - [`context`] - Region/project override resolution
//! - [`config`] - Client configuration and explicit/environment layering
//! - [`query`] - Query string helper

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder, Credentials};
pub use config::{ApiConfig, ConfigLayer, LayeredConfig};
pub use context::{EffectiveContext, RequestOptions};
pub use error::{ApiError, Error, Result};
