//! The CRUD contract every managed resource implements.

use crate::attr::Attr;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use prodata_core::context::RequestOptions;
use std::fmt::Debug;

/// Result of reading a tracked resource back from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<S> {
    /// The object exists; carries refreshed state
    Present(S),
    /// The object no longer exists and should leave tracked state
    Gone,
}

impl<S> ReadOutcome<S> {
    /// Map an API lookup to an outcome, turning "not found" into [`ReadOutcome::Gone`].
    ///
    /// # Errors
    ///
    /// Any other API failure is returned unchanged.
    pub fn from_lookup(result: prodata_core::Result<S>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Self::Present(value)),
            Err(err) if err.is_not_found() => Ok(Self::Gone),
            Err(err) => Err(err.into()),
        }
    }

    /// Transform the present value.
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> ReadOutcome<T> {
        match self {
            Self::Present(value) => ReadOutcome::Present(f(value)),
            Self::Gone => ReadOutcome::Gone,
        }
    }
}

/// A managed resource type.
///
/// Region and project are resolved once at create time and are part of the
/// resource's identity afterwards, as are other create-only attributes.
/// Changing any identity attribute requires replacement.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Tracked state of one instance.
    type State: Clone + PartialEq + Debug + Send + Sync;

    /// Type name, e.g. `prodata_volume`.
    fn type_name(&self) -> &'static str;

    /// State expected after apply, given the prior state and the configuration.
    ///
    /// Computed values come from `prior` when there is one and are
    /// [`Attr::Unknown`] otherwise.
    fn plan_state(&self, prior: Option<&Self::State>, desired: &Self::State) -> Self::State;

    /// Identity attributes that differ between `prior` and `planned`.
    fn requires_replace(&self, prior: &Self::State, planned: &Self::State) -> Vec<&'static str>;

    /// Create the remote object and return the state to persist.
    async fn create(&self, planned: &Self::State) -> Result<Self::State>;

    /// Refresh non-identity attributes from the API.
    async fn read(&self, current: &Self::State) -> Result<ReadOutcome<Self::State>>;

    /// Apply mutable attribute changes.
    async fn update(&self, prior: &Self::State, planned: &Self::State) -> Result<Self::State>;

    /// Delete the remote object.
    async fn delete(&self, current: &Self::State) -> Result<()>;
}

/// Overrides built from tracked region/project attributes.
pub(crate) fn scope_options(region: &Attr<String>, project_id: &Attr<i64>) -> RequestOptions {
    RequestOptions {
        region: region.known().cloned(),
        project_id: project_id.known().copied(),
    }
}

pub(crate) fn known_id(resource: &'static str, id: &Attr<i64>) -> Result<i64> {
    id.known()
        .copied()
        .ok_or_else(|| ProviderError::state(resource, "id is not known"))
}

#[allow(clippy::ptr_arg)]
pub(crate) fn region_is_set(region: &String) -> bool {
    !region.is_empty()
}

pub(crate) fn project_is_set(project_id: &i64) -> bool {
    *project_id != 0
}
