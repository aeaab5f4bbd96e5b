//! Per-call region/project resolution.
//!
//! Every request runs against an effective region and project. Callers may
//! override either value for a single call; anything not overridden falls back
//! to the client-level default. An empty region or a project ID of `0` counts
//! as "not overridden", so project `0` cannot be targeted explicitly.

use crate::query::QueryParams;
use serde::{Deserialize, Serialize};

/// Optional per-call overrides for region and project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Region override (e.g. `UZ-5`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Project override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

impl RequestOptions {
    /// Create empty overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            region: None,
            project_id: None,
        }
    }

    /// Override the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the project.
    #[must_use]
    pub const fn with_project_id(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Region override, if set to a non-empty value.
    #[must_use]
    pub fn region_override(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }

    /// Project override, if set to a non-zero value.
    #[must_use]
    pub fn project_override(&self) -> Option<i64> {
        self.project_id.filter(|p| *p != 0)
    }

    /// Returns true if neither value would override a default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region_override().is_none() && self.project_override().is_none()
    }

    /// Render the effective overrides as query pairs (`region`, `projectId`).
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("region", self.region_override());
        params.push_opt("projectId", self.project_override());
        params
    }
}

/// Region and project actually sent with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveContext {
    /// Region identifier
    pub region: String,
    /// Project identifier
    pub project_id: i64,
}

impl EffectiveContext {
    /// Create a context from explicit values.
    #[must_use]
    pub fn new(region: impl Into<String>, project_id: i64) -> Self {
        Self {
            region: region.into(),
            project_id,
        }
    }

    /// Apply `overrides` on top of `self`, field by field.
    #[must_use]
    pub fn resolve(&self, overrides: Option<&RequestOptions>) -> Self {
        resolve(self, overrides)
    }
}

/// Compute the effective context for one call.
///
/// Region and project are resolved independently: a present, non-empty region
/// override wins over `defaults.region`, and a present, non-zero project
/// override wins over `defaults.project_id`.
#[must_use]
pub fn resolve(defaults: &EffectiveContext, overrides: Option<&RequestOptions>) -> EffectiveContext {
    let region = overrides
        .and_then(RequestOptions::region_override)
        .unwrap_or(defaults.region.as_str());
    let project_id = overrides
        .and_then(RequestOptions::project_override)
        .unwrap_or(defaults.project_id);

    EffectiveContext {
        region: region.to_string(),
        project_id,
    }
}
