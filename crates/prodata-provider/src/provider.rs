//! Provider configuration and factories for resources and data sources.

use crate::data_sources::{
    ImageDataSource, ImagesDataSource, LocalNetworkDataSource, LocalNetworksDataSource,
    VolumeDataSource, VolumesDataSource,
};
use crate::diagnostics::Diagnostics;
use crate::error::{ProviderError, Result};
use crate::local_network::{LocalNetworkResource, LOCAL_NETWORK_RESOURCE};
use crate::reconciler::Reconciler;
use crate::volume::{VolumeResource, VOLUME_RESOURCE};
use prodata_core::config::{
    ENV_API_BASE_URL, ENV_API_KEY_ID, ENV_API_SECRET_KEY,
};
use prodata_core::{ApiClient, ApiConfig, ConfigLayer};
use prodata_image::ImageClient;
use prodata_network::LocalNetworkClient;
use prodata_volume::VolumeClient;
use secrecy::ExposeSecret;
use tracing::{debug, info};

/// Provider type name.
pub const PROVIDER_NAME: &str = "prodata";

/// Managed resource types.
pub const RESOURCE_TYPES: [&str; 2] = [VOLUME_RESOURCE, LOCAL_NETWORK_RESOURCE];

/// Data source types.
pub const DATA_SOURCE_TYPES: [&str; 6] = [
    "prodata_image",
    "prodata_images",
    "prodata_volume",
    "prodata_volumes",
    "prodata_local_network",
    "prodata_local_networks",
];

/// User agent sent by a provider build of `version`.
#[must_use]
pub fn user_agent(version: &str) -> String {
    format!("terraform-provider-{PROVIDER_NAME}/{version}")
}

/// Entity clients sharing one connection pool.
#[derive(Debug, Clone)]
pub struct Clients {
    /// Image lookups
    pub images: ImageClient,
    /// Volumes
    pub volumes: VolumeClient,
    /// Local networks
    pub local_networks: LocalNetworkClient,
}

impl Clients {
    /// Build entity clients on top of one transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            images: ImageClient::new(api.clone()),
            volumes: VolumeClient::new(api.clone()),
            local_networks: LocalNetworkClient::new(api),
        }
    }
}

/// The ProData provider.
#[derive(Debug, Clone)]
pub struct Provider {
    version: String,
    clients: Option<Clients>,
}

impl Provider {
    /// Unconfigured provider for the given build version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            clients: None,
        }
    }

    /// Build version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns true once [`Provider::configure`] has succeeded.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.clients.is_some()
    }

    /// Configure from explicit settings, falling back to `PRODATA_*` variables.
    pub fn configure(&mut self, explicit: ConfigLayer) -> Diagnostics {
        self.configure_with(explicit, |key| std::env::var(key).ok())
    }

    /// Configure from explicit settings and an environment lookup.
    ///
    /// Every missing required setting is reported, not just the first one.
    pub fn configure_with<F>(&mut self, explicit: ConfigLayer, lookup: F) -> Diagnostics
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut diags = Diagnostics::new();
        let from_env = |key: &str| lookup(key).is_some_and(|value| !value.is_empty());

        if explicit.api_base_url.as_deref().map_or(!from_env(ENV_API_BASE_URL), str::is_empty) {
            diags.add_attribute_error(
                "api_base_url",
                "Missing API Base URL",
                format!("Set api_base_url in config or {ENV_API_BASE_URL} environment variable."),
            );
        }
        if explicit.api_key_id.as_deref().map_or(!from_env(ENV_API_KEY_ID), str::is_empty) {
            diags.add_attribute_error(
                "api_key_id",
                "Missing API Key ID",
                format!("Set api_key_id in config or {ENV_API_KEY_ID} environment variable."),
            );
        }
        if explicit
            .api_secret_key
            .as_ref()
            .map_or(!from_env(ENV_API_SECRET_KEY), |s| s.expose_secret().is_empty())
        {
            diags.add_attribute_error(
                "api_secret_key",
                "Missing API Secret Key",
                format!(
                    "Set api_secret_key in config or {ENV_API_SECRET_KEY} environment variable."
                ),
            );
        }
        if diags.has_error() {
            return diags;
        }

        let layered = match ApiConfig::layered(explicit, &lookup) {
            Ok(layered) => layered,
            Err(err) => {
                diags.add_error("Invalid provider configuration", err.to_string());
                return diags;
            }
        };
        for warning in layered.warnings {
            diags.add_warning("Invalid provider setting", warning);
        }

        let config = layered.config.with_user_agent(user_agent(&self.version));
        debug!(
            base_url = %config.api_base_url,
            region = %config.region,
            project_id = config.project_id,
            "Configuring provider"
        );
        match ApiClient::from_config(config) {
            Ok(api) => {
                info!(base_url = api.base_url(), "Provider configured");
                self.clients = Some(Clients::new(api));
            }
            Err(err) => diags.add_error("Failed to create client", err.to_string()),
        }
        diags
    }

    /// Entity clients.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn clients(&self) -> Result<&Clients> {
        self.clients.as_ref().ok_or(ProviderError::NotConfigured)
    }

    /// `prodata_volume` resource.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn volume_resource(&self) -> Result<Reconciler<VolumeResource<VolumeClient>>> {
        let clients = self.clients()?;
        Ok(Reconciler::new(VolumeResource::new(clients.volumes.clone())))
    }

    /// `prodata_local_network` resource.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn local_network_resource(
        &self,
    ) -> Result<Reconciler<LocalNetworkResource<LocalNetworkClient>>> {
        let clients = self.clients()?;
        Ok(Reconciler::new(LocalNetworkResource::new(
            clients.local_networks.clone(),
        )))
    }

    /// `prodata_image` data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn image_data_source(&self) -> Result<ImageDataSource<ImageClient>> {
        Ok(ImageDataSource(self.clients()?.images.clone()))
    }

    /// `prodata_images` data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn images_data_source(&self) -> Result<ImagesDataSource<ImageClient>> {
        Ok(ImagesDataSource(self.clients()?.images.clone()))
    }

    /// `prodata_volume` data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn volume_data_source(&self) -> Result<VolumeDataSource<VolumeClient>> {
        Ok(VolumeDataSource(self.clients()?.volumes.clone()))
    }

    /// `prodata_volumes` data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn volumes_data_source(&self) -> Result<VolumesDataSource<VolumeClient>> {
        Ok(VolumesDataSource(self.clients()?.volumes.clone()))
    }

    /// `prodata_local_network` data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn local_network_data_source(&self) -> Result<LocalNetworkDataSource<LocalNetworkClient>> {
        Ok(LocalNetworkDataSource(self.clients()?.local_networks.clone()))
    }

    /// `prodata_local_networks` data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] before a successful configure.
    pub fn local_networks_data_source(
        &self,
    ) -> Result<LocalNetworksDataSource<LocalNetworkClient>> {
        Ok(LocalNetworksDataSource(self.clients()?.local_networks.clone()))
    }
}
