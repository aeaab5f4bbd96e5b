//! Asynchronous volume client.

use crate::models::{CreateVolumeRequest, UpdateVolumeRequest, Volume};
use crate::Result;
use prodata_core::context::RequestOptions;
use prodata_core::ApiClient;
use reqwest::Method;
use tracing::debug;

const VOLUMES_PATH: &str = "/api/v2/volumes";

/// Volume operations on top of a shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct VolumeClient {
    api: ApiClient,
}

impl VolumeClient {
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

    /// List volumes.
    pub async fn list(&self, options: Option<&RequestOptions>) -> Result<Vec<Volume>> {
        self.api.get_json(VOLUMES_PATH, options).await
    }

    /// Fetch a volume by ID.
    pub async fn get(&self, id: i64, options: Option<&RequestOptions>) -> Result<Volume> {
        let path = format!("{VOLUMES_PATH}/{id}");
        self.api.get_json(&path, options).await
    }

    /// Create a volume.
    ///
    /// Not idempotent: repeating the call creates another volume.
    pub async fn create(&self, request: &CreateVolumeRequest) -> Result<Volume> {
        let options = request.options();
        let context = self.api.resolve_context(Some(&options));
        debug!(
            name = %request.name,
            region = %context.region,
            project_id = context.project_id,
            "Creating volume"
        );
        let body = request.to_body(&context);
        self.api
            .execute(Method::POST, VOLUMES_PATH, Some(&body), Some(&options))
            .await
    }

    /// Rename a volume.
    ///
    /// Explicit overrides are also sent as `region`/`projectId` query parameters.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateVolumeRequest,
        options: Option<&RequestOptions>,
    ) -> Result<Volume> {
        let path = item_path(id, options);
        self.api
            .execute(Method::PUT, &path, Some(request), options)
            .await
    }

    /// Delete a volume.
    ///
    /// Deleting an ID that no longer exists surfaces the server's error.
    pub async fn delete(&self, id: i64, options: Option<&RequestOptions>) -> Result<()> {
        let path = item_path(id, options);
        self.api
            .execute_empty::<()>(Method::DELETE, &path, None, options)
            .await
    }
}

fn item_path(id: i64, options: Option<&RequestOptions>) -> String {
    let path = format!("{VOLUMES_PATH}/{id}");
    match options {
        Some(options) => options.to_query().append_to(&path),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodata_core::{Credentials, Error};
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> VolumeClient {
        let api = ApiClient::builder(
            server.uri(),
            Credentials::new("key", SecretString::from("secret".to_string())),
        )
        .with_region("KZ-1")
        .with_project_id(10)
        .build()
        .unwrap();
        VolumeClient::new(api)
    }

    fn volume_json(name: &str) -> serde_json::Value {
        json!({
            "id": 55, "name": name, "type": "SSD", "size": 20,
            "inUse": false, "attachedId": null
        })
    }

    fn ok(data: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data, "errors": []}))
    }

    #[test]
    fn item_path_appends_overrides() {
        assert_eq!(item_path(5, None), "/api/v2/volumes/5");
        assert_eq!(
            item_path(5, Some(&RequestOptions::new())),
            "/api/v2/volumes/5"
        );
        assert_eq!(
            item_path(5, Some(&RequestOptions::new().with_region("UZ-5").with_project_id(3))),
            "/api/v2/volumes/5?region=UZ-5&projectId=3"
        );
    }

    #[tokio::test]
    async fn create_fills_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/panel-main/api/v2/volumes"))
            .and(header("x-region", "KZ-1"))
            .and(body_json(json!({
                "region": "KZ-1", "projectId": 10, "name": "data", "type": "SSD", "size": 20
            })))
            .respond_with(ok(volume_json("data")))
            .expect(1)
            .mount(&server)
            .await;

        let volume = test_client(&server)
            .create(&CreateVolumeRequest::new("data", "SSD", 20))
            .await
            .unwrap();
        assert_eq!(volume.id, 55);
        assert_eq!(volume.attached_id, None);
    }

    #[tokio::test]
    async fn create_with_explicit_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/panel-main/api/v2/volumes"))
            .and(header("x-region", "UZ-5"))
            .and(header("x-project-id", "77"))
            .and(body_json(json!({
                "region": "UZ-5", "projectId": 77, "name": "data", "type": "SSD", "size": 20
            })))
            .respond_with(ok(volume_json("data")))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreateVolumeRequest::new("data", "SSD", 20)
            .with_region("UZ-5")
            .with_project_id(77);
        test_client(&server).create(&request).await.unwrap();
    }

    #[tokio::test]
    async fn update_sends_name_and_query_overrides() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/panel-main/api/v2/volumes/55"))
            .and(query_param("region", "UZ-5"))
            .and(body_json(json!({"name": "renamed"})))
            .respond_with(ok(volume_json("renamed")))
            .expect(1)
            .mount(&server)
            .await;

        let opts = RequestOptions::new().with_region("UZ-5");
        let volume = test_client(&server)
            .update(55, &UpdateVolumeRequest::new("renamed"), Some(&opts))
            .await
            .unwrap();
        assert_eq!(volume.name, "renamed");
    }

    #[tokio::test]
    async fn get_and_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/panel-main/api/v2/volumes/55"))
            .respond_with(ok(volume_json("data")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/panel-main/api/v2/volumes"))
            .respond_with(ok(json!([volume_json("a"), volume_json("b")])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert_eq!(client.get(55, None).await.unwrap().name, "data");
        assert_eq!(client.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_missing_volume_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/panel-main/api/v2/volumes/404"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errors": [{"code": 404, "message": "volume not found"}]
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).delete(404, None).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(err.is_not_found());
    }
}
