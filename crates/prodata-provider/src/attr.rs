//! Three-state attribute values.
//!
//! Declarative configuration distinguishes a value that was never set
//! ([`Attr::Null`]) from one that will only be known after apply
//! ([`Attr::Unknown`]) and from a concrete value ([`Attr::Known`]). Keeping the
//! distinction structural means "unset" never collapses into a zero value.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};

/// An optional attribute that may not be known until apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr<T> {
    /// Not set.
    Null,
    /// Computed by the server during apply.
    Unknown,
    /// Concrete value.
    Known(T),
}

impl<T> Default for Attr<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> Attr<T> {
    /// Returns true for [`Attr::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for [`Attr::Unknown`].
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The concrete value, if any.
    #[must_use]
    pub const fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Consume into the concrete value, if any.
    #[must_use]
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Clone> Attr<T> {
    /// Concrete value unless it counts as unset, otherwise `fallback`.
    ///
    /// Used to carry computed identity values (region, project) from prior
    /// state into a plan when configuration leaves them out.
    #[must_use]
    pub fn known_or(&self, fallback: Option<&Self>, is_set: impl Fn(&T) -> bool) -> Self {
        match self.known().filter(|value| is_set(value)) {
            Some(value) => Self::Known(value.clone()),
            None => fallback.cloned().unwrap_or(Self::Unknown),
        }
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Known(value) => serializer.serialize_some(value),
            Self::Unknown => Err(S::Error::custom(
                "unknown values cannot be persisted before apply",
            )),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Attr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
