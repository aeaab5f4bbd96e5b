//! # prodata-provider
//!
//! Reconciliation layer that exposes ProData volumes, local networks and
//! images as declarative resources and data sources.
//!
//! ## Modules
//!
//! - [`attr`] - Null/unknown/known attribute values
//! - [`api`] - Traits over the entity clients
//! - [`lifecycle`] - Actions, plans and lifecycle stages
//! - [`resource`] - The CRUD contract for managed resources
//! - [`reconciler`] - Plans and applies changes for a resource
//! - [`volume`] / [`local_network`] - Managed resources
//! - [`data_sources`] - Read-only lookups
//! - [`provider`] - Configuration and factories
//!
//! ## Example
//!
//! ```no_run
//! use prodata_core::ConfigLayer;
//! use prodata_provider::{Provider, Tracked, VolumeState};
//!
//! # async fn example() -> prodata_provider::Result<()> {
//! let mut provider = Provider::new(env!("CARGO_PKG_VERSION"));
//! let diags = provider.configure(ConfigLayer::default());
//! assert!(!diags.has_error());
//!
//! let volumes = provider.volume_resource()?;
//! let mut current = Tracked::planned();
//! let plan = volumes.plan(&current, Some(&VolumeState::new("data", "SSD", 20)));
//! volumes.apply(&mut current, &plan).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod attr;
pub mod data_sources;
pub mod diagnostics;
pub mod error;
pub mod lifecycle;
pub mod local_network;
pub mod provider;
pub mod reconciler;
pub mod resource;
pub mod volume;

pub use api::{ImageApi, LocalNetworkApi, VolumeApi};
pub use attr::Attr;
pub use data_sources::{ByIdQuery, DataSource, ImageQuery, Listing, Located, Scope};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use lifecycle::{plan_action, Action, Lifecycle, Plan};
pub use local_network::{LocalNetworkResource, LocalNetworkState};
pub use provider::{user_agent, Clients, Provider};
pub use reconciler::{Reconciler, Tracked};
pub use resource::{ReadOutcome, Resource};
pub use volume::{VolumeResource, VolumeState};
