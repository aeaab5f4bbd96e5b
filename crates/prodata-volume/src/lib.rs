//! Volume client and data models for the ProData Cloud API.
//!
//! Volumes are block devices with an immutable type and size; only the name
//! can change after creation.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::VolumeClient;
pub use models::{CreateVolumeRequest, UpdateVolumeRequest, Volume};

/// Convenient result alias using the shared ProData error type.
pub type Result<T> = prodata_core::Result<T>;
