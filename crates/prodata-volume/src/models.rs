//! Volume data models.

use prodata_core::context::{EffectiveContext, RequestOptions};
use serde::{Deserialize, Serialize};

/// Volume representation returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume ID.
    pub id: i64,
    /// Volume name.
    #[serde(default)]
    pub name: String,
    /// Storage type (`HDD`, `SSD`).
    #[serde(rename = "type", default)]
    pub volume_type: String,
    /// Size in GB.
    #[serde(default)]
    pub size: i64,
    /// Whether the volume is attached to an instance.
    #[serde(default)]
    pub in_use: bool,
    /// Instance the volume is attached to; `None` when unattached.
    #[serde(default)]
    pub attached_id: Option<i64>,
}

/// Parameters for creating a volume.
///
/// `region` and `project_id` fall back to the client defaults when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateVolumeRequest {
    /// Target region.
    pub region: Option<String>,
    /// Target project.
    pub project_id: Option<i64>,
    /// Volume name.
    pub name: String,
    /// Storage type.
    pub volume_type: String,
    /// Size in GB.
    pub size: i64,
}

impl CreateVolumeRequest {
    /// Create a request in the default region and project.
    #[must_use]
    pub fn new(name: impl Into<String>, volume_type: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            volume_type: volume_type.into(),
            size,
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
    pub fn to_body(&self, context: &EffectiveContext) -> CreateVolumeBody<'_> {
        CreateVolumeBody {
            region: context.region.clone(),
            project_id: context.project_id,
            name: &self.name,
            volume_type: &self.volume_type,
            size: self.size,
        }
    }
}

/// JSON body sent to `POST /api/v2/volumes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolumeBody<'a> {
    /// Resolved region.
    pub region: String,
    /// Resolved project.
    pub project_id: i64,
    /// Volume name.
    pub name: &'a str,
    /// Storage type.
    #[serde(rename = "type")]
    pub volume_type: &'a str,
    /// Size in GB.
    pub size: i64,
}

/// Update payload. Only the name can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVolumeRequest {
    /// New name.
    pub name: String,
}

impl UpdateVolumeRequest {
    /// Rename a volume.
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
    fn attached_id_null_means_unattached() {
        let volume: Volume = serde_json::from_value(json!({
            "id": 1, "name": "data", "type": "SSD", "size": 20,
            "inUse": false, "attachedId": null
        }))
        .unwrap();
        assert_eq!(volume.attached_id, None);
    }

    #[test]
    fn attached_id_round_trips() {
        let raw = json!({
            "id": 1, "name": "data", "type": "SSD", "size": 20,
            "inUse": true, "attachedId": 9_007_199_254_740_993_i64
        });
        let volume: Volume = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(volume.attached_id, Some(9_007_199_254_740_993));
        assert_eq!(serde_json::to_value(&volume).unwrap(), raw);
    }

    #[test]
    fn create_body_uses_resolved_context() {
        let request = CreateVolumeRequest::new("data", "HDD", 50);
        let body = request.to_body(&EffectiveContext::new("KZ-1", 3));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"region": "KZ-1", "projectId": 3, "name": "data", "type": "HDD", "size": 50})
        );
    }

    #[test]
    fn update_body_has_only_name() {
        let body = serde_json::to_value(UpdateVolumeRequest::new("renamed")).unwrap();
        assert_eq!(body, json!({"name": "renamed"}));
    }
}
