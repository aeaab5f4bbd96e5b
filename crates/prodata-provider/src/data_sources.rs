//! Read-only data sources.
//!
//! Each data source resolves region/project the same way resources do and
//! reports the values it actually used next to the result.

use crate::api::{ImageApi, LocalNetworkApi, VolumeApi};
use crate::attr::Attr;
use crate::error::Result;
use async_trait::async_trait;
use prodata_core::context::{EffectiveContext, RequestOptions};
use prodata_image::{Image, ImageLookup};
use prodata_network::LocalNetwork;
use prodata_volume::Volume;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A read-only lookup exposed to configuration.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Configuration accepted by the lookup.
    type Query: Send + Sync;
    /// Value produced by the lookup.
    type Output: Send;

    /// Type name, e.g. `prodata_image`.
    fn type_name(&self) -> &'static str;

    /// Run the lookup.
    async fn read(&self, query: &Self::Query) -> Result<Self::Output>;
}

/// Optional region/project selection shared by every data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Region override
    #[serde(default)]
    pub region: Attr<String>,
    /// Project override
    #[serde(default)]
    pub project_id: Attr<i64>,
}

impl Scope {
    /// Overrides for the API call.
    #[must_use]
    pub fn options(&self) -> RequestOptions {
        crate::resource::scope_options(&self.region, &self.project_id)
    }
}

/// A single object and the region/project it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Located<T> {
    /// Effective region
    pub region: String,
    /// Effective project
    pub project_id: i64,
    /// The object itself
    #[serde(flatten)]
    pub item: T,
}

/// A list of objects and the region/project they were read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<T> {
    /// Effective region
    pub region: String,
    /// Effective project
    pub project_id: i64,
    /// Objects returned by the API
    pub items: Vec<T>,
}

impl<T> Located<T> {
    fn new(context: EffectiveContext, item: T) -> Self {
        Self {
            region: context.region,
            project_id: context.project_id,
            item,
        }
    }
}

impl<T> Listing<T> {
    fn new(context: EffectiveContext, items: Vec<T>) -> Self {
        Self {
            region: context.region,
            project_id: context.project_id,
            items,
        }
    }
}

/// Query for `prodata_image`; exactly one of `slug` and `name` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageQuery {
    /// Image slug
    #[serde(default)]
    pub slug: Attr<String>,
    /// Image name
    #[serde(default)]
    pub name: Attr<String>,
    /// Region/project selection
    #[serde(flatten)]
    pub scope: Scope,
}

impl ImageQuery {
    fn to_lookup(&self) -> ImageLookup {
        ImageLookup {
            slug: self.slug.known().cloned(),
            name: self.name.known().cloned(),
            options: self.scope.options(),
        }
    }
}

/// Query for data sources that fetch one object by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ByIdQuery {
    /// Object ID
    pub id: i64,
    /// Region/project selection
    #[serde(flatten)]
    pub scope: Scope,
}

/// `prodata_image`: one image by slug or name.
#[derive(Debug, Clone)]
pub struct ImageDataSource<A>(pub A);

#[async_trait]
impl<A: ImageApi> DataSource for ImageDataSource<A> {
    type Query = ImageQuery;
    type Output = Located<Image>;

    fn type_name(&self) -> &'static str {
        "prodata_image"
    }

    async fn read(&self, query: &ImageQuery) -> Result<Located<Image>> {
        let lookup = query.to_lookup();
        // Reject bad key combinations before anything reaches the API.
        lookup.to_query()?;

        let context = self.0.resolve_context(&lookup.options);
        debug!(slug = ?lookup.slug, name = ?lookup.name, region = %context.region, "Reading image");
        let image = self.0.lookup(&lookup).await?;
        Ok(Located::new(context, image))
    }
}

/// `prodata_images`: every visible image.
#[derive(Debug, Clone)]
pub struct ImagesDataSource<A>(pub A);

#[async_trait]
impl<A: ImageApi> DataSource for ImagesDataSource<A> {
    type Query = Scope;
    type Output = Listing<Image>;

    fn type_name(&self) -> &'static str {
        "prodata_images"
    }

    async fn read(&self, scope: &Scope) -> Result<Listing<Image>> {
        let options = scope.options();
        let context = self.0.resolve_context(&options);
        let images = self.0.list_all(&options).await?;
        debug!(count = images.len(), "Listed images");
        Ok(Listing::new(context, images))
    }
}

/// `prodata_volume`: one volume by ID, including attachment status.
#[derive(Debug, Clone)]
pub struct VolumeDataSource<A>(pub A);

#[async_trait]
impl<A: VolumeApi> DataSource for VolumeDataSource<A> {
    type Query = ByIdQuery;
    type Output = Located<Volume>;

    fn type_name(&self) -> &'static str {
        "prodata_volume"
    }

    async fn read(&self, query: &ByIdQuery) -> Result<Located<Volume>> {
        let options = query.scope.options();
        let context = self.0.resolve_context(&options);
        let volume = self.0.get(query.id, &options).await?;
        Ok(Located::new(context, volume))
    }
}

/// `prodata_volumes`: every volume in the project.
#[derive(Debug, Clone)]
pub struct VolumesDataSource<A>(pub A);

#[async_trait]
impl<A: VolumeApi> DataSource for VolumesDataSource<A> {
    type Query = Scope;
    type Output = Listing<Volume>;

    fn type_name(&self) -> &'static str {
        "prodata_volumes"
    }

    async fn read(&self, scope: &Scope) -> Result<Listing<Volume>> {
        let options = scope.options();
        let context = self.0.resolve_context(&options);
        let volumes = self.0.list(&options).await?;
        Ok(Listing::new(context, volumes))
    }
}

/// `prodata_local_network`: one local network by ID.
#[derive(Debug, Clone)]
pub struct LocalNetworkDataSource<A>(pub A);

#[async_trait]
impl<A: LocalNetworkApi> DataSource for LocalNetworkDataSource<A> {
    type Query = ByIdQuery;
    type Output = Located<LocalNetwork>;

    fn type_name(&self) -> &'static str {
        "prodata_local_network"
    }

    async fn read(&self, query: &ByIdQuery) -> Result<Located<LocalNetwork>> {
        let options = query.scope.options();
        let context = self.0.resolve_context(&options);
        let network = self.0.get(query.id, &options).await?;
        Ok(Located::new(context, network))
    }
}

/// `prodata_local_networks`: every local network in the project.
#[derive(Debug, Clone)]
pub struct LocalNetworksDataSource<A>(pub A);

#[async_trait]
impl<A: LocalNetworkApi> DataSource for LocalNetworksDataSource<A> {
    type Query = Scope;
    type Output = Listing<LocalNetwork>;

    fn type_name(&self) -> &'static str {
        "prodata_local_networks"
    }

    async fn read(&self, scope: &Scope) -> Result<Listing<LocalNetwork>> {
        let options = scope.options();
        let context = self.0.resolve_context(&options);
        let networks = self.0.list(&options).await?;
        Ok(Listing::new(context, networks))
    }
}
