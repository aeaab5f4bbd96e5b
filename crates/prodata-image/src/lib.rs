//! Image lookups for the ProData Cloud API.
//!
//! Images are read-only: OS templates are found by slug, custom images by name.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ImageClient;
pub use models::{Image, ImageLookup};

/// Convenient result alias using the shared ProData error type.
pub type Result<T> = prodata_core::Result<T>;
