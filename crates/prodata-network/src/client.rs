//! Asynchronous local network client.

use crate::models::{CreateLocalNetworkRequest, LocalNetwork, UpdateLocalNetworkRequest};
use crate::Result;
use prodata_core::context::RequestOptions;
use prodata_core::ApiClient;
use reqwest::Method;
use tracing::debug;

const LOCAL_NETWORKS_PATH: &str = "/api/v2/local-networks";

/// Local network operations on top of a shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct LocalNetworkClient {
    api: ApiClient,
}

impl LocalNetworkClient {
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

    /// List local networks.
    pub async fn list(&self, options: Option<&RequestOptions>) -> Result<Vec<LocalNetwork>> {
        self.api.get_json(LOCAL_NETWORKS_PATH, options).await
    }

    /// Fetch a local network by ID.
    pub async fn get(&self, id: i64, options: Option<&RequestOptions>) -> Result<LocalNetwork> {
        let path = format!("{LOCAL_NETWORKS_PATH}/{id}");
        self.api.get_json(&path, options).await
    }

    /// Create a local network.
    pub async fn create(&self, request: &CreateLocalNetworkRequest) -> Result<LocalNetwork> {
        let options = request.options();
        let context = self.api.resolve_context(Some(&options));
        debug!(
            name = %request.name,
            cidr = %request.cidr,
            region = %context.region,
            project_id = context.project_id,
            "Creating local network"
        );
        let body = request.to_body(&context);
        self.api
            .execute(Method::POST, LOCAL_NETWORKS_PATH, Some(&body), Some(&options))
            .await
    }

    /// Rename a local network.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateLocalNetworkRequest,
        options: Option<&RequestOptions>,
    ) -> Result<LocalNetwork> {
        let path = item_path(id, options);
        self.api
            .execute(Method::PUT, &path, Some(request), options)
            .await
    }

    /// Delete a local network.
    pub async fn delete(&self, id: i64, options: Option<&RequestOptions>) -> Result<()> {
        let path = item_path(id, options);
        self.api
            .execute_empty::<()>(Method::DELETE, &path, None, options)
            .await
    }
}

fn item_path(id: i64, options: Option<&RequestOptions>) -> String {
    let path = format!("{LOCAL_NETWORKS_PATH}/{id}");
    options.map_or_else(|| path.clone(), |options| options.to_query().append_to(&path))
}
