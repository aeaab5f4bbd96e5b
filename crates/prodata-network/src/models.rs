//! Local network data models.

use prodata_core::context::{EffectiveContext, RequestOptions};
use serde::{Deserialize, Serialize};

/// Local network as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNetwork {
    /// Network ID.
    pub id: i64,
    /// Network name.
    #[serde(default)]
    pub name: String,
    /// Address range, e.g. `10.0.0.0/24`.
    #[serde(default)]
    pub cidr: String,
    /// Gateway address inside the range.
    #[serde(default)]
    pub gateway: String,
    /// Whether any instance is attached to the network.
    #[serde(default)]
    pub linked: bool,
}

/// Parameters for creating a local network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateLocalNetworkRequest {
    /// Target region; client default when unset.
    pub region: Option<String>,
    /// Target project; client default when unset.
    pub project_id: Option<i64>,
    /// Network name.
    pub name: String,
    /// Address range.
    pub cidr: String,
    /// Gateway address.
    pub gateway: String,
}

impl CreateLocalNetworkRequest {
    /// Create a request in the default region and project.
    #[must_use]
    pub fn new(name: impl Into<String>, cidr: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cidr: cidr.into(),
            gateway: gateway.into(),
            ..Self::default()
        }
    }

    /// Target a specific region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Target a specific project.
    #[must_use]
    pub const fn with_project_id(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Region/project requested by the caller, as call overrides.
    #[must_use]
    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            region: self.region.clone(),
            project_id: self.project_id,
        }
    }

    /// Wire body for the resolved context.
    #[must_use]
    pub fn to_body(&self, context: &EffectiveContext) -> CreateLocalNetworkBody<'_> {
        CreateLocalNetworkBody {
            region: context.region.clone(),
            project_id: context.project_id,
            name: &self.name,
            cidr: &self.cidr,
            gateway: &self.gateway,
        }
    }
}

/// JSON body sent to `POST /api/v2/local-networks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocalNetworkBody<'a> {
    /// Resolved region.
    pub region: String,
    /// Resolved project.
    pub project_id: i64,
    /// Network name.
    pub name: &'a str,
    /// Address range.
    pub cidr: &'a str,
    /// Gateway address.
    pub gateway: &'a str,
}

/// Update payload. CIDR and gateway are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLocalNetworkRequest {
    /// New name.
    pub name: String,
}

impl UpdateLocalNetworkRequest {
    /// Rename a network.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn linked_defaults_to_false() {
        let network: LocalNetwork = serde_json::from_value(json!({
            "id": 7, "name": "private", "cidr": "10.0.0.0/24", "gateway": "10.0.0.1"
        }))
        .unwrap();
        assert!(!network.linked);
    }

    #[test]
    fn create_body_shape() {
        let request = CreateLocalNetworkRequest::new("private", "10.0.0.0/24", "10.0.0.1")
            .with_project_id(5);
        let body = request.to_body(&EffectiveContext::new("UZ-5", 5));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "region": "UZ-5", "projectId": 5, "name": "private",
                "cidr": "10.0.0.0/24", "gateway": "10.0.0.1"
            })
        );
    }
}
