//! `prodata_local_network` resource.

use crate::api::LocalNetworkApi;
use crate::attr::Attr;
use crate::error::Result;
use crate::resource::{
    known_id, project_is_set, region_is_set, scope_options, ReadOutcome, Resource,
};
use async_trait::async_trait;
use prodata_core::context::EffectiveContext;
use prodata_network::{CreateLocalNetworkRequest, LocalNetwork, UpdateLocalNetworkRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resource type name.
pub const LOCAL_NETWORK_RESOURCE: &str = "prodata_local_network";

/// Tracked state of a local network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNetworkState {
    /// Server-assigned ID
    #[serde(default)]
    pub id: Attr<i64>,
    /// Region; provider default when not configured
    #[serde(default)]
    pub region: Attr<String>,
    /// Project; provider default when not configured
    #[serde(default)]
    pub project_id: Attr<i64>,
    /// Network name, the only mutable attribute
    pub name: String,
    /// Address range
    pub cidr: String,
    /// Gateway address
    pub gateway: String,
}

impl LocalNetworkState {
    /// Desired configuration in the provider's default region and project.
    #[must_use]
    pub fn new(name: impl Into<String>, cidr: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cidr: cidr.into(),
            gateway: gateway.into(),
            ..Self::default()
        }
    }

    /// Pin the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Attr::Known(region.into());
        self
    }

    /// Pin the project.
    #[must_use]
    pub fn with_project_id(mut self, project_id: i64) -> Self {
        self.project_id = Attr::Known(project_id);
        self
    }

    fn from_remote(network: LocalNetwork, context: EffectiveContext) -> Self {
        Self {
            id: Attr::Known(network.id),
            region: Attr::Known(context.region),
            project_id: Attr::Known(context.project_id),
            name: network.name,
            cidr: network.cidr,
            gateway: network.gateway,
        }
    }

    fn refreshed(&self, network: LocalNetwork) -> Self {
        Self {
            name: network.name,
            cidr: network.cidr,
            gateway: network.gateway,
            ..self.clone()
        }
    }
}

/// Local network resource backed by a [`LocalNetworkApi`].
#[derive(Debug, Clone)]
pub struct LocalNetworkResource<A> {
    api: A,
}

impl<A: LocalNetworkApi> LocalNetworkResource<A> {
    /// Create the resource on top of an API implementation.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: LocalNetworkApi> Resource for LocalNetworkResource<A> {
    type State = LocalNetworkState;

    fn type_name(&self) -> &'static str {
        LOCAL_NETWORK_RESOURCE
    }

    fn plan_state(
        &self,
        prior: Option<&LocalNetworkState>,
        desired: &LocalNetworkState,
    ) -> LocalNetworkState {
        LocalNetworkState {
            id: prior.map_or(Attr::Unknown, |prior| prior.id.clone()),
            region: desired
                .region
                .known_or(prior.map(|prior| &prior.region), region_is_set),
            project_id: desired
                .project_id
                .known_or(prior.map(|prior| &prior.project_id), project_is_set),
            ..desired.clone()
        }
    }

    fn requires_replace(
        &self,
        prior: &LocalNetworkState,
        planned: &LocalNetworkState,
    ) -> Vec<&'static str> {
        [
            ("region", prior.region != planned.region),
            ("project_id", prior.project_id != planned.project_id),
            ("cidr", prior.cidr != planned.cidr),
            ("gateway", prior.gateway != planned.gateway),
        ]
        .into_iter()
        .filter_map(|(field, changed)| changed.then_some(field))
        .collect()
    }

    async fn create(&self, planned: &LocalNetworkState) -> Result<LocalNetworkState> {
        let options = scope_options(&planned.region, &planned.project_id);
        let context = self.api.resolve_context(&options);

        let request =
            CreateLocalNetworkRequest::new(&planned.name, &planned.cidr, &planned.gateway)
                .with_region(context.region.clone())
                .with_project_id(context.project_id);
        let network = self.api.create(&request).await?;

        debug!(id = network.id, name = %network.name, "Created local network");
        Ok(LocalNetworkState::from_remote(network, context))
    }

    async fn read(&self, current: &LocalNetworkState) -> Result<ReadOutcome<LocalNetworkState>> {
        let id = known_id(LOCAL_NETWORK_RESOURCE, &current.id)?;
        let options = scope_options(&current.region, &current.project_id);
        debug!(id, "Reading local network");

        let outcome = ReadOutcome::from_lookup(self.api.get(id, &options).await)?;
        Ok(outcome.map(|network| current.refreshed(network)))
    }

    async fn update(
        &self,
        prior: &LocalNetworkState,
        planned: &LocalNetworkState,
    ) -> Result<LocalNetworkState> {
        let id = known_id(LOCAL_NETWORK_RESOURCE, &prior.id)?;
        let options = scope_options(&prior.region, &prior.project_id);
        let request = UpdateLocalNetworkRequest::new(&planned.name);
        debug!(id, name = %request.name, "Updating local network");

        let network = self.api.update(id, &request, &options).await?;
        Ok(prior.refreshed(network))
    }

    async fn delete(&self, current: &LocalNetworkState) -> Result<()> {
        let id = known_id(LOCAL_NETWORK_RESOURCE, &current.id)?;
        let options = scope_options(&current.region, &current.project_id);
        debug!(id, "Deleting local network");
        self.api.delete(id, &options).await?;
        Ok(())
    }
}
