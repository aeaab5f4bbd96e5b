//! `prodata_volume` resource.

use crate::api::VolumeApi;
use crate::attr::Attr;
use crate::error::Result;
use crate::resource::{
    known_id, project_is_set, region_is_set, scope_options, ReadOutcome, Resource,
};
use async_trait::async_trait;
use prodata_core::context::EffectiveContext;
use prodata_volume::{CreateVolumeRequest, UpdateVolumeRequest, Volume};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resource type name.
pub const VOLUME_RESOURCE: &str = "prodata_volume";

/// Tracked state of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeState {
    /// Server-assigned ID
    #[serde(default)]
    pub id: Attr<i64>,
    /// Region; provider default when not configured
    #[serde(default)]
    pub region: Attr<String>,
    /// Project; provider default when not configured
    #[serde(default)]
    pub project_id: Attr<i64>,
    /// Volume name, the only mutable attribute
    pub name: String,
    /// Storage type (`HDD`, `SSD`)
    #[serde(rename = "type")]
    pub volume_type: String,
    /// Size in GB
    pub size: i64,
}

impl VolumeState {
    /// Desired configuration in the provider's default region and project.
    #[must_use]
    pub fn new(name: impl Into<String>, volume_type: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            volume_type: volume_type.into(),
            size,
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

    fn from_remote(volume: Volume, context: EffectiveContext) -> Self {
        Self {
            id: Attr::Known(volume.id),
            region: Attr::Known(context.region),
            project_id: Attr::Known(context.project_id),
            name: volume.name,
            volume_type: volume.volume_type,
            size: volume.size,
        }
    }

    fn refreshed(&self, volume: Volume) -> Self {
        Self {
            name: volume.name,
            volume_type: volume.volume_type,
            size: volume.size,
            ..self.clone()
        }
    }
}

/// Volume resource backed by a [`VolumeApi`].
#[derive(Debug, Clone)]
pub struct VolumeResource<A> {
    api: A,
}

impl<A: VolumeApi> VolumeResource<A> {
    /// Create the resource on top of an API implementation.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: VolumeApi> Resource for VolumeResource<A> {
    type State = VolumeState;

    fn type_name(&self) -> &'static str {
        VOLUME_RESOURCE
    }

    fn plan_state(&self, prior: Option<&VolumeState>, desired: &VolumeState) -> VolumeState {
        VolumeState {
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

    fn requires_replace(&self, prior: &VolumeState, planned: &VolumeState) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if prior.region != planned.region {
            fields.push("region");
        }
        if prior.project_id != planned.project_id {
            fields.push("project_id");
        }
        if prior.volume_type != planned.volume_type {
            fields.push("type");
        }
        if prior.size != planned.size {
            fields.push("size");
        }
        fields
    }

    async fn create(&self, planned: &VolumeState) -> Result<VolumeState> {
        let options = scope_options(&planned.region, &planned.project_id);
        let context = self.api.resolve_context(&options);

        let request = CreateVolumeRequest::new(&planned.name, &planned.volume_type, planned.size)
            .with_region(context.region.clone())
            .with_project_id(context.project_id);
        let volume = self.api.create(&request).await?;

        debug!(id = volume.id, name = %volume.name, "Created volume");
        Ok(VolumeState::from_remote(volume, context))
    }

    async fn read(&self, current: &VolumeState) -> Result<ReadOutcome<VolumeState>> {
        let id = known_id(VOLUME_RESOURCE, &current.id)?;
        let options = scope_options(&current.region, &current.project_id);
        debug!(id, region = ?options.region, project_id = ?options.project_id, "Reading volume");

        let outcome = ReadOutcome::from_lookup(self.api.get(id, &options).await)?;
        Ok(outcome.map(|volume| current.refreshed(volume)))
    }

    async fn update(&self, prior: &VolumeState, planned: &VolumeState) -> Result<VolumeState> {
        let id = known_id(VOLUME_RESOURCE, &prior.id)?;
        let options = scope_options(&prior.region, &prior.project_id);
        let request = UpdateVolumeRequest::new(&planned.name);
        debug!(id, name = %request.name, "Updating volume");

        let volume = self.api.update(id, &request, &options).await?;
        Ok(prior.refreshed(volume))
    }

    async fn delete(&self, current: &VolumeState) -> Result<()> {
        let id = known_id(VOLUME_RESOURCE, &current.id)?;
        let options = scope_options(&current.region, &current.project_id);
        debug!(id, "Deleting volume");
        self.api.delete(id, &options).await?;
        Ok(())
    }
}
