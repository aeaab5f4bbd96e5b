//! Local (private) network client and data models for the ProData Cloud API.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::LocalNetworkClient;
pub use models::{CreateLocalNetworkRequest, LocalNetwork, UpdateLocalNetworkRequest};

/// Convenient result alias using the shared ProData error type.
pub type Result<T> = prodata_core::Result<T>;
