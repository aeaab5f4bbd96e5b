//! Asynchronous image client.

use crate::models::{Image, ImageLookup};
use crate::Result;
use prodata_core::context::RequestOptions;
use prodata_core::ApiClient;
use tracing::debug;

const IMAGE_PATH: &str = "/api/v2/image";
const IMAGES_PATH: &str = "/api/v2/images";

/// Image operations on top of a shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ImageClient {
    api: ApiClient,
}

impl ImageClient {
    /// Wrap a shared API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Access the underlying transport.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Find a single image by slug or name.
    ///
    /// Invalid lookups fail before any request is sent.
    pub async fn lookup(&self, lookup: &ImageLookup) -> Result<Image> {
        let path = lookup.to_query()?.append_to(IMAGE_PATH);
        debug!(%path, "Looking up image");
        self.api.get_json(&path, Some(&lookup.options)).await
    }

    /// List every image visible in the effective region/project.
    pub async fn list_all(&self, options: Option<&RequestOptions>) -> Result<Vec<Image>> {
        self.api.get_json(IMAGES_PATH, options).await
    }
}
