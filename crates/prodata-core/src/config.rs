//! Configuration structures for ProData clients.
//!
//! Settings can be supplied explicitly or through environment variables; an
//! explicit value always wins over the environment.

use crate::context::EffectiveContext;
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::warn;
use url::Url;
use validator::Validate;

/// Environment variable for the API base URL.
pub const ENV_API_BASE_URL: &str = "PRODATA_API_BASE_URL";
/// Environment variable for the API key ID.
pub const ENV_API_KEY_ID: &str = "PRODATA_API_KEY_ID";
/// Environment variable for the API secret key.
pub const ENV_API_SECRET_KEY: &str = "PRODATA_API_SECRET_KEY";
/// Environment variable for the default region.
pub const ENV_REGION: &str = "PRODATA_REGION";
/// Environment variable for the default project ID.
pub const ENV_PROJECT_ID: &str = "PRODATA_PROJECT_ID";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_USER_AGENT: &str = concat!("prodata-core/", env!("CARGO_PKG_VERSION"));

/// Configuration for a ProData client instance.
///
/// Holds the credentials and the client-wide defaults used whenever a call
/// does not override region or project.
#[derive(Debug, Validate)]
pub struct ApiConfig {
    /// API base URL (e.g. `https://my.pro-data.tech`)
    #[validate(url)]
    pub api_base_url: String,

    /// API key ID
    #[validate(length(min = 1))]
    pub api_key_id: String,

    /// API secret key
    pub api_secret_key: SecretString,

    /// Default region
    pub region: String,

    /// Default project ID
    pub project_id: i64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new configuration with the required credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or a credential is empty.
    pub fn new(
        api_base_url: impl Into<String>,
        api_key_id: impl Into<String>,
        api_secret_key: SecretString,
    ) -> Result<Self, Error> {
        let config = Self {
            api_base_url: api_base_url.into(),
            api_key_id: api_key_id.into(),
            api_secret_key,
            region: String::new(),
            project_id: 0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        config.check()?;
        Ok(config)
    }

    /// Resolve configuration from an explicit layer and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if required settings are missing or invalid.
    pub fn from_env(explicit: ConfigLayer) -> Result<LayeredConfig, Error> {
        Self::layered(explicit, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from an explicit layer and an environment lookup.
    ///
    /// Each setting takes the explicit value when present and the environment
    /// variable otherwise. An unparsable project ID in the environment is
    /// reported as a warning and leaves the project unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming every missing required setting, or the
    /// validation failure of the assembled configuration.
    pub fn layered<F>(explicit: ConfigLayer, lookup: F) -> Result<LayeredConfig, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let api_base_url = explicit
            .api_base_url
            .or_else(|| lookup(ENV_API_BASE_URL))
            .unwrap_or_default();
        let api_key_id = explicit
            .api_key_id
            .or_else(|| lookup(ENV_API_KEY_ID))
            .unwrap_or_default();
        let api_secret_key = explicit
            .api_secret_key
            .or_else(|| lookup(ENV_API_SECRET_KEY).map(SecretString::from))
            .unwrap_or_else(|| SecretString::from(String::new()));
        let region = explicit
            .region
            .or_else(|| lookup(ENV_REGION))
            .unwrap_or_default();

        let project_id = match explicit.project_id {
            Some(id) => id,
            None => match lookup(ENV_PROJECT_ID).filter(|raw| !raw.is_empty()) {
                Some(raw) => raw.parse::<i64>().unwrap_or_else(|err| {
                    let message =
                        format!("Could not parse {ENV_PROJECT_ID}={raw:?} as integer: {err}");
                    warn!("{message}");
                    warnings.push(message);
                    0
                }),
                None => 0,
            },
        };

        let mut missing = Vec::new();
        if api_base_url.is_empty() {
            missing.push(format!("api_base_url ({ENV_API_BASE_URL})"));
        }
        if api_key_id.is_empty() {
            missing.push(format!("api_key_id ({ENV_API_KEY_ID})"));
        }
        if api_secret_key.expose_secret().is_empty() {
            missing.push(format!("api_secret_key ({ENV_API_SECRET_KEY})"));
        }
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }

        let config = Self::new(api_base_url, api_key_id, api_secret_key)?
            .with_region(region)
            .with_project_id(project_id);

        Ok(LayeredConfig { config, warnings })
    }

    /// Set the default region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the default project ID.
    #[must_use]
    pub const fn with_project_id(mut self, project_id: i64) -> Self {
        self.project_id = project_id;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Client-wide region/project defaults.
    #[must_use]
    pub fn defaults(&self) -> EffectiveContext {
        EffectiveContext::new(self.region.clone(), self.project_id)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_base_url)
            .map_err(|e| Error::Config(format!("Invalid API base URL: {e}")))
    }

    /// Validate every field, including the secret key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;
        if self.api_secret_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "Invalid configuration: api_secret_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Explicitly configured values; `None` means "not configured here".
#[derive(Debug, Default)]
pub struct ConfigLayer {
    /// API base URL
    pub api_base_url: Option<String>,
    /// API key ID
    pub api_key_id: Option<String>,
    /// API secret key
    pub api_secret_key: Option<SecretString>,
    /// Default region
    pub region: Option<String>,
    /// Default project ID
    pub project_id: Option<i64>,
}

/// Result of layering explicit settings over the environment.
#[derive(Debug)]
pub struct LayeredConfig {
    /// The resolved configuration
    pub config: ApiConfig,
    /// Non-fatal problems found while resolving
    pub warnings: Vec<String>,
}
