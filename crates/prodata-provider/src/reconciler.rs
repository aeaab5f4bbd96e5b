//! Drives a [`Resource`] through planned actions.

use crate::error::{ProviderError, Result};
use crate::lifecycle::{plan_action, Action, Lifecycle, Plan};
use crate::resource::{ReadOutcome, Resource};
use tracing::{debug, info, warn};

/// A resource instance as tracked between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<S> {
    /// Persisted state; `None` until created and after deletion
    pub state: Option<S>,
    /// Current lifecycle stage
    pub lifecycle: Lifecycle,
}

impl<S> Tracked<S> {
    /// An instance that has not been created yet.
    #[must_use]
    pub const fn planned() -> Self {
        Self {
            state: None,
            lifecycle: Lifecycle::Planned,
        }
    }

    /// An instance whose remote object is gone.
    #[must_use]
    pub const fn deleted() -> Self {
        Self {
            state: None,
            lifecycle: Lifecycle::Deleted,
        }
    }

    /// An instance restored from persisted state.
    #[must_use]
    pub const fn synced(state: S) -> Self {
        Self {
            state: Some(state),
            lifecycle: Lifecycle::Synced,
        }
    }
}

/// Plans and applies changes for one resource type.
#[derive(Debug, Clone)]
pub struct Reconciler<R> {
    resource: R,
}

impl<R: Resource> Reconciler<R> {
    /// Wrap a resource implementation.
    #[must_use]
    pub const fn new(resource: R) -> Self {
        Self { resource }
    }

    /// The wrapped resource.
    #[must_use]
    pub const fn resource(&self) -> &R {
        &self.resource
    }

    /// Compute the action that moves `current` to `desired`.
    ///
    /// `desired = None` means the resource was removed from configuration.
    pub fn plan(&self, current: &Tracked<R::State>, desired: Option<&R::State>) -> Plan<R::State> {
        let prior = current.state.as_ref();
        let planned = desired.map(|desired| self.resource.plan_state(prior, desired));
        let replace = match (prior, planned.as_ref()) {
            (Some(prior), Some(planned)) => self.resource.requires_replace(prior, planned),
            _ => Vec::new(),
        };
        let action = plan_action(prior, planned.as_ref(), &replace);
        debug!(resource = self.resource.type_name(), %action, "Planned action");
        Plan { action, planned }
    }

    /// Apply a plan produced by [`Reconciler::plan`], updating `tracked` in place.
    ///
    /// Replacement deletes the old object before creating the new one. Once
    /// the delete has succeeded `tracked` holds no state, so a failing create
    /// leaves it matching the remote side and a fresh plan yields
    /// [`Action::Create`].
    ///
    /// # Errors
    ///
    /// Returns the first failing API call, or [`ProviderError::State`] if the
    /// plan does not fit the tracked state.
    pub async fn apply(&self, tracked: &mut Tracked<R::State>, plan: &Plan<R::State>) -> Result<()> {
        let name = self.resource.type_name();
        let planned = plan.planned.as_ref();

        let state = match &plan.action {
            Action::NoOp => tracked.state.take(),
            Action::Create => {
                let planned = require(name, planned, "planned state")?;
                Some(self.resource.create(planned).await?)
            }
            Action::Update => {
                let prior = require(name, tracked.state.as_ref(), "prior state")?;
                let planned = require(name, planned, "planned state")?;
                Some(self.resource.update(prior, planned).await?)
            }
            Action::Replace { fields } => {
                let prior = require(name, tracked.state.as_ref(), "prior state")?;
                let planned = require(name, planned, "planned state")?;
                info!(resource = name, ?fields, "Replacing resource");
                self.resource.delete(prior).await?;
                *tracked = Tracked::deleted();

                let fresh = self.resource.plan_state(None, planned);
                Some(self.resource.create(&fresh).await.map_err(|err| {
                    warn!(resource = name, error = %err, "Create failed after delete during replace");
                    err
                })?)
            }
            Action::Delete => {
                let prior = require(name, tracked.state.as_ref(), "prior state")?;
                self.resource.delete(prior).await?;
                None
            }
        };

        tracked.lifecycle = tracked.lifecycle.after(&plan.action);
        tracked.state = state;
        info!(resource = name, action = %plan.action, lifecycle = ?tracked.lifecycle, "Applied");
        Ok(())
    }

    /// Re-read tracked state from the API.
    ///
    /// A resource that no longer exists is dropped from tracking instead of
    /// failing.
    ///
    /// # Errors
    ///
    /// Returns any API failure other than "not found".
    pub async fn refresh(&self, current: &Tracked<R::State>) -> Result<Tracked<R::State>> {
        let Some(state) = current.state.as_ref() else {
            return Ok(current.clone());
        };

        match self.resource.read(state).await? {
            ReadOutcome::Present(state) => Ok(Tracked::synced(state)),
            ReadOutcome::Gone => {
                warn!(
                    resource = self.resource.type_name(),
                    "Resource no longer exists, removing from state"
                );
                Ok(Tracked::deleted())
            }
        }
    }
}

fn require<'a, S>(resource: &'static str, value: Option<&'a S>, what: &str) -> Result<&'a S> {
    value.ok_or_else(|| ProviderError::state(resource, format!("{what} is missing")))
}
