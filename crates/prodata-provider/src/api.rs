//! Seams between the reconciliation layer and the entity clients.
//!
//! Resources and data sources talk to these traits rather than to the
//! concrete clients, so their logic can run against mocks.

use async_trait::async_trait;
use prodata_core::context::{EffectiveContext, RequestOptions};
use prodata_core::Result;
use prodata_image::{Image, ImageClient, ImageLookup};
use prodata_network::{
    CreateLocalNetworkRequest, LocalNetwork, LocalNetworkClient, UpdateLocalNetworkRequest,
};
use prodata_volume::{CreateVolumeRequest, UpdateVolumeRequest, Volume, VolumeClient};

/// Image lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Region/project a call with `options` runs against.
    fn resolve_context(&self, options: &RequestOptions) -> EffectiveContext;

    /// Find one image by slug or name.
    async fn lookup(&self, lookup: &ImageLookup) -> Result<Image>;

    /// List all images.
    async fn list_all(&self, options: &RequestOptions) -> Result<Vec<Image>>;
}

/// Volume operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VolumeApi: Send + Sync {
    /// Region/project a call with `options` runs against.
    fn resolve_context(&self, options: &RequestOptions) -> EffectiveContext;

    /// Fetch one volume.
    async fn get(&self, id: i64, options: &RequestOptions) -> Result<Volume>;

    /// List volumes.
    async fn list(&self, options: &RequestOptions) -> Result<Vec<Volume>>;

    /// Create a volume.
    async fn create(&self, request: &CreateVolumeRequest) -> Result<Volume>;

    /// Rename a volume.
    async fn update(
        &self,
        id: i64,
        request: &UpdateVolumeRequest,
        options: &RequestOptions,
    ) -> Result<Volume>;

    /// Delete a volume.
    async fn delete(&self, id: i64, options: &RequestOptions) -> Result<()>;
}

/// Local network operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalNetworkApi: Send + Sync {
    /// Region/project a call with `options` runs against.
    fn resolve_context(&self, options: &RequestOptions) -> EffectiveContext;

    /// Fetch one local network.
    async fn get(&self, id: i64, options: &RequestOptions) -> Result<LocalNetwork>;

    /// List local networks.
    async fn list(&self, options: &RequestOptions) -> Result<Vec<LocalNetwork>>;

    /// Create a local network.
    async fn create(&self, request: &CreateLocalNetworkRequest) -> Result<LocalNetwork>;

    /// Rename a local network.
    async fn update(
        &self,
        id: i64,
        request: &UpdateLocalNetworkRequest,
        options: &RequestOptions,
    ) -> Result<LocalNetwork>;

    /// Delete a local network.
    async fn delete(&self, id: i64, options: &RequestOptions) -> Result<()>;
}

#[async_trait]
impl ImageApi for ImageClient {
    fn resolve_context(&self, options: &RequestOptions) -> EffectiveContext {
        self.api().resolve_context(Some(options))
    }

    async fn lookup(&self, lookup: &ImageLookup) -> Result<Image> {
        ImageClient::lookup(self, lookup).await
    }

    async fn list_all(&self, options: &RequestOptions) -> Result<Vec<Image>> {
        ImageClient::list_all(self, Some(options)).await
    }
}

#[async_trait]
impl VolumeApi for VolumeClient {
    fn resolve_context(&self, options: &RequestOptions) -> EffectiveContext {
        self.api().resolve_context(Some(options))
    }

    async fn get(&self, id: i64, options: &RequestOptions) -> Result<Volume> {
        VolumeClient::get(self, id, Some(options)).await
    }

    async fn list(&self, options: &RequestOptions) -> Result<Vec<Volume>> {
        VolumeClient::list(self, Some(options)).await
    }

    async fn create(&self, request: &CreateVolumeRequest) -> Result<Volume> {
        VolumeClient::create(self, request).await
    }

    async fn update(
        &self,
        id: i64,
        request: &UpdateVolumeRequest,
        options: &RequestOptions,
    ) -> Result<Volume> {
        VolumeClient::update(self, id, request, Some(options)).await
    }

    async fn delete(&self, id: i64, options: &RequestOptions) -> Result<()> {
        VolumeClient::delete(self, id, Some(options)).await
    }
}

#[async_trait]
impl LocalNetworkApi for LocalNetworkClient {
    fn resolve_context(&self, options: &RequestOptions) -> EffectiveContext {
        self.api().resolve_context(Some(options))
    }

    async fn get(&self, id: i64, options: &RequestOptions) -> Result<LocalNetwork> {
        LocalNetworkClient::get(self, id, Some(options)).await
    }

    async fn list(&self, options: &RequestOptions) -> Result<Vec<LocalNetwork>> {
        LocalNetworkClient::list(self, Some(options)).await
    }

    async fn create(&self, request: &CreateLocalNetworkRequest) -> Result<LocalNetwork> {
        LocalNetworkClient::create(self, request).await
    }

    async fn update(
        &self,
        id: i64,
        request: &UpdateLocalNetworkRequest,
        options: &RequestOptions,
    ) -> Result<LocalNetwork> {
        LocalNetworkClient::update(self, id, request, Some(options)).await
    }

    async fn delete(&self, id: i64, options: &RequestOptions) -> Result<()> {
        LocalNetworkClient::delete(self, id, Some(options)).await
    }
}
