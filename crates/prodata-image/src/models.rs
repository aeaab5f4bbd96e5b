//! Image models.

use crate::Result;
use prodata_core::context::RequestOptions;
use prodata_core::query::QueryParams;
use prodata_core::Error;
use serde::{Deserialize, Serialize};

/// OS template or custom image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image ID.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Slug, e.g. `ubuntu-22.04`.
    #[serde(default)]
    pub slug: String,
    /// Whether this is a custom image rather than an OS template.
    #[serde(default)]
    pub is_custom: bool,
}

/// Lookup criteria for a single image.
///
/// Exactly one of `slug` and `name` must be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageLookup {
    /// Lookup by slug (OS templates).
    pub slug: Option<String>,
    /// Lookup by name (custom images).
    pub name: Option<String>,
    /// Per-call region/project overrides.
    pub options: RequestOptions,
}

impl ImageLookup {
    /// Look up an image by slug.
    #[must_use]
    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Look up an image by name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Attach per-call overrides.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the query for `/api/v2/image`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] unless exactly one lookup key is non-empty.
    pub fn to_query(&self) -> Result<QueryParams> {
        let slug = self.slug.as_deref().filter(|s| !s.is_empty());
        let name = self.name.as_deref().filter(|s| !s.is_empty());

        let mut params = QueryParams::new();
        match (slug, name) {
            (Some(slug), None) => params.push("slug", slug),
            (None, Some(name)) => params.push("name", name),
            (None, None) => {
                return Err(Error::Validation(
                    "either slug or name is required".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(Error::Validation(
                    "slug and name are mutually exclusive".to_string(),
                ))
            }
        }
        Ok(params)
    }
}
