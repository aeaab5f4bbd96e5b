//! Authenticated HTTP transport for the ProData API.
//!
//! [`ApiClient`] owns immutable credentials and defaults plus one pooled
//! `reqwest` client. It keeps no per-call state, so a single instance can be
//! cloned and shared between independent callers.

use crate::config::ApiConfig;
use crate::context::{EffectiveContext, RequestOptions};
use crate::envelope::Envelope;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, ClientBuilder, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Fixed path prefix appended to the configured base URL.
pub const API_PATH_PREFIX: &str = "/panel-main";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Header carrying the API key ID.
pub const HEADER_KEY_ID: &str = "X-Api-Key-Id";
/// Header carrying the API secret key.
pub const HEADER_SECRET_KEY: &str = "X-Api-Secret-Key";
/// Header carrying the effective region.
pub const HEADER_REGION: &str = "X-Region";
/// Header carrying the effective project ID.
pub const HEADER_PROJECT_ID: &str = "X-Project-Id";

const MAX_LOG_BODY_LENGTH: usize = 512;

/// API credentials. The secret key is never printed.
#[derive(Debug)]
pub struct Credentials {
    key_id: String,
    secret_key: SecretString,
}

impl Credentials {
    /// Create credentials from a key ID and secret key.
    #[must_use]
    pub fn new(key_id: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            secret_key,
        }
    }

    /// The API key ID.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: String,
    credentials: Credentials,
    user_agent: String,
    defaults: EffectiveContext,
    timeout: Duration,
    pool_idle_timeout: Duration,
    pool_max_idle_per_host: usize,
}

impl ApiClientBuilder {
    /// Create a builder for the specified base URL and credentials.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            user_agent: String::new(),
            defaults: EffectiveContext::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the default region used when a call does not override it.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.defaults.region = region.into();
        self
    }

    /// Set the default project used when a call does not override it.
    #[must_use]
    pub const fn with_project_id(mut self, project_id: i64) -> Self {
        self.defaults.project_id = project_id;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a credential is missing, the base URL does
    /// not parse, or the HTTP stack cannot be initialised.
    pub fn build(self) -> Result<ApiClient> {
        if self.base_url.is_empty()
            || self.credentials.key_id.is_empty()
            || self.credentials.secret_key.expose_secret().is_empty()
        {
            return Err(Error::Config(
                "api_base_url, api_key_id, and api_secret_key are required".to_string(),
            ));
        }

        let base_url = format!("{}{API_PATH_PREFIX}", self.base_url.trim_end_matches('/'));
        url::Url::parse(&base_url).map_err(|err| {
            Error::Config(format!("Invalid API base URL `{}`: {err}", self.base_url))
        })?;

        let http = ClientBuilder::new()
            .timeout(self.timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()
            .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(ApiClient {
            http,
            base_url: Arc::from(base_url),
            credentials: Arc::new(self.credentials),
            user_agent: Arc::from(self.user_agent),
            defaults: Arc::new(self.defaults),
        })
    }
}

/// Stateless, shareable ProData API client.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<str>,
    credentials: Arc<Credentials>,
    user_agent: Arc<str>,
    defaults: Arc<EffectiveContext>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("key_id", &self.credentials.key_id)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Start a builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>, credentials: Credentials) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url, credentials)
    }

    /// Construct a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn from_config(config: ApiConfig) -> Result<Self> {
        config.check()?;
        let timeout = config.timeout();
        ApiClientBuilder::new(
            config.api_base_url,
            Credentials::new(config.api_key_id, config.api_secret_key),
        )
        .with_user_agent(config.user_agent)
        .with_region(config.region)
        .with_project_id(config.project_id)
        .with_timeout(timeout)
        .build()
    }

    /// Base URL including the API path prefix.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client-wide region/project defaults.
    #[must_use]
    pub fn defaults(&self) -> &EffectiveContext {
        &self.defaults
    }

    /// Region/project that a call with `overrides` would use.
    #[must_use]
    pub fn resolve_context(&self, overrides: Option<&RequestOptions>) -> EffectiveContext {
        self.defaults.resolve(overrides)
    }

    /// Issue a request and decode the envelope's `data` into `R`.
    ///
    /// `path` is appended to the base URL as-is and may carry a query string.
    ///
    /// # Errors
    ///
    /// - [`Error::Encoding`] if `body` cannot be serialized or a header value is not valid
    /// - [`Error::Transport`] on network failures
    /// - [`Error::Decode`] if the response is not an envelope or `data` has the wrong shape
    /// - [`Error::Api`] if the envelope reports failure
    pub async fn execute<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        overrides: Option<&RequestOptions>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (status, envelope) = self.send(method, path, body, overrides).await?;
        envelope.into_data(status)
    }

    /// Issue a request where only success or failure matters.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::execute`], except that `data` is never decoded.
    pub async fn execute_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        overrides: Option<&RequestOptions>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let (status, envelope) = self.send(method, path, body, overrides).await?;
        envelope.into_success(status).map(|_| ())
    }

    /// Convenience wrapper for `GET` requests.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get_json<R>(&self, path: &str, overrides: Option<&RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.execute::<(), R>(Method::GET, path, None, overrides)
            .await
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        overrides: Option<&RequestOptions>,
    ) -> Result<(u16, Envelope)>
    where
        B: Serialize + ?Sized,
    {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| Error::Encoding(format!("{method} {path}: {err}")))?;

        let context = self.resolve_context(overrides);
        let url = format!("{}{path}", self.base_url);
        let headers = self.headers(&context)?;

        debug!(
            %method,
            %url,
            region = %context.region,
            project_id = context.project_id,
            "API request"
        );
        if let Some(bytes) = &payload {
            debug!(body = %String::from_utf8_lossy(bytes), "API request body");
        }

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(bytes) = payload {
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|err| {
            warn!(%method, %url, error = %err, "API request failed");
            Error::from(err)
        })?;

        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "API response");

        let bytes = response.bytes().await.map_err(|err| {
            warn!(%method, %url, error = %err, "Failed to read API response body");
            Error::Transport(format!("failed to read response body: {err}"))
        })?;
        trace!(body = %truncate_for_log(&bytes), "API response body");

        let envelope = Envelope::parse(&bytes).map_err(|err| {
            warn!(%method, %url, status = status.as_u16(), "API response is not an envelope");
            match err {
                Error::Decode(message) => Error::Decode(format!("{message} (HTTP {status})")),
                other => other,
            }
        })?;

        if !envelope.success {
            warn!(
                %method,
                %url,
                status = status.as_u16(),
                region = %context.region,
                project_id = context.project_id,
                errors = ?envelope.errors,
                "API returned error response"
            );
        }

        Ok((status.as_u16(), envelope))
    }

    fn headers(&self, context: &EffectiveContext) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.user_agent.is_empty() {
            headers.insert(USER_AGENT, header_value("User-Agent", &self.user_agent)?);
        }
        headers.insert(
            HEADER_KEY_ID,
            header_value(HEADER_KEY_ID, &self.credentials.key_id)?,
        );

        let mut secret = header_value(HEADER_SECRET_KEY, self.credentials.secret_key.expose_secret())?;
        secret.set_sensitive(true);
        headers.insert(HEADER_SECRET_KEY, secret);

        headers.insert(HEADER_REGION, header_value(HEADER_REGION, &context.region)?);
        headers.insert(HEADER_PROJECT_ID, HeaderValue::from(context.project_id));
        Ok(headers)
    }
}

// The offending value is left out of the message so a bad secret never leaks.
fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Encoding(format!("value for header {name} contains invalid characters")))
}

fn truncate_for_log(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &text[..end], text.len())
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Thing {
        id: i64,
        name: String,
    }

    fn test_client(server: &MockServer) -> ApiClient {
        ApiClient::builder(
            server.uri(),
            Credentials::new("key-id", SecretString::from("top-secret".to_string())),
        )
        .with_user_agent("prodata-tests/1.0")
        .with_region("KZ-1")
        .with_project_id(42)
        .build()
        .unwrap()
    }

    fn ok(data: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": data,
            "errors": []
        }))
    }

    #[test]
    fn build_requires_credentials() {
        let err = ApiClient::builder(
            "https://example.com",
            Credentials::new("", SecretString::from("s".to_string())),
        )
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn base_url_gets_prefix() {
        let client = ApiClient::builder(
            "https://my.pro-data.tech/",
            Credentials::new("k", SecretString::from("s".to_string())),
        )
        .build()
        .unwrap();
        assert_eq!(client.base_url(), "https://my.pro-data.tech/panel-main");
    }

    #[test]
    fn debug_output_hides_secret() {
        let client = ApiClient::builder(
            "https://my.pro-data.tech",
            Credentials::new("k", SecretString::from("top-secret".to_string())),
        )
        .build()
        .unwrap();
        assert!(!format!("{client:?}").contains("top-secret"));
    }

    #[tokio::test]
    async fn sends_auth_and_context_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/panel-main/api/v2/things/1"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", "prodata-tests/1.0"))
            .and(header("x-api-key-id", "key-id"))
            .and(header("x-api-secret-key", "top-secret"))
            .and(header("x-region", "KZ-1"))
            .and(header("x-project-id", "42"))
            .respond_with(ok(json!({"id": 1, "name": "one"})))
            .expect(1)
            .mount(&server)
            .await;

        let thing: Thing = test_client(&server)
            .get_json("/api/v2/things/1", None)
            .await
            .unwrap();
        assert_eq!(thing, Thing { id: 1, name: "one".into() });
    }

    #[tokio::test]
    async fn overrides_replace_header_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/panel-main/api/v2/things/1"))
            .and(header("x-region", "UZ-5"))
            .and(header("x-project-id", "42"))
            .respond_with(ok(json!({"id": 1, "name": "one"})))
            .expect(1)
            .mount(&server)
            .await;

        let opts = RequestOptions::new().with_region("UZ-5");
        let _: Thing = test_client(&server)
            .get_json("/api/v2/things/1", Some(&opts))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn path_query_string_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/panel-main/api/v2/image"))
            .and(query_param("slug", "ubuntu-22.04"))
            .respond_with(ok(json!({"id": 3, "name": "Ubuntu"})))
            .mount(&server)
            .await;

        let thing: Thing = test_client(&server)
            .get_json("/api/v2/image?slug=ubuntu-22.04", None)
            .await
            .unwrap();
        assert_eq!(thing.id, 3);
    }

    #[tokio::test]
    async fn body_is_serialized_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/panel-main/api/v2/things"))
            .and(body_json(json!({"name": "new"})))
            .respond_with(ok(json!({"id": 5, "name": "new"})))
            .expect(1)
            .mount(&server)
            .await;

        let thing: Thing = test_client(&server)
            .execute(Method::POST, "/api/v2/things", Some(&json!({"name": "new"})), None)
            .await
            .unwrap();
        assert_eq!(thing.id, 5);
    }

    #[tokio::test]
    async fn failed_envelope_without_errors_is_unknown_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": false, "errors": []})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_json::<Thing>("/api/v2/things/1", None)
            .await
            .unwrap_err();
        match err {
            Error::Api(api) => assert_eq!(api.message, "unknown error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_envelope_joins_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "errors": [{"code": 404, "message": "not found"}]
            })))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .execute_empty::<()>(Method::DELETE, "/api/v2/things/9", None, None)
            .await
            .unwrap_err();
        let api = err.as_api_error().unwrap();
        assert_eq!(api.message, "[404] not found");
        assert_eq!(api.status, 404);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_json::<Thing>("/api/v2/things/1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn array_body_is_not_an_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([false])))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .execute_empty(Method::DELETE, "/api/v2/things/1", None::<&()>, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn data_shape_mismatch_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ok(json!({"id": "not-a-number"})))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_json::<Thing>("/api/v2/things/1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn empty_call_ignores_data() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ok(json!("whatever")))
            .mount(&server)
            .await;

        test_client(&server)
            .execute_empty::<()>(Method::DELETE, "/api/v2/things/1", None, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        // Reserve a port, then free it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::builder(
            format!("http://{addr}"),
            Credentials::new("key-id", SecretString::from("top-secret".to_string())),
        )
        .with_region("KZ-1")
        .build()
        .unwrap();

        let err = client
            .get_json::<Thing>("/api/v2/things/1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!err.to_string().contains("top-secret"));
    }

    #[tokio::test]
    async fn unserializable_body_is_encoding_error() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("cannot serialize"))
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ok(json!(null)))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .execute_empty(Method::POST, "/api/v2/things", Some(&Broken), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[tokio::test]
    async fn invalid_header_value_is_encoding_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ok(json!({"id": 1, "name": "one"})))
            .expect(0)
            .mount(&server)
            .await;

        let overrides = RequestOptions::new().with_region("KZ-1\nX-Injected: yes");
        let err = test_client(&server)
            .get_json::<Thing>("/api/v2/things/1", Some(&overrides))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(err.to_string().contains("X-Region"));
        assert!(!err.to_string().contains("X-Injected"));
    }
}
