//! Planned actions and per-resource lifecycle.

use serde::{Deserialize, Serialize};

/// Action needed to move a resource from its prior to its desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Create a new remote object
    Create,
    /// Change mutable attributes in place
    Update,
    /// Delete and recreate because identity attributes changed
    Replace {
        /// Identity attributes that differ
        fields: Vec<String>,
    },
    /// Delete the remote object
    Delete,
    /// No changes needed
    NoOp,
}

impl Action {
    /// Returns true unless this is [`Action::NoOp`].
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Replace { fields } => write!(f, "replace ({})", fields.join(", ")),
            Self::Delete => write!(f, "delete"),
            Self::NoOp => write!(f, "no-op"),
        }
    }
}

/// Where a tracked resource instance is in its life.
///
/// `Planned → Created → Synced → (Updated | Deleted)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Declared but not yet created
    #[default]
    Planned,
    /// Created by the last apply
    Created,
    /// Matches remote state as of the last read
    Synced,
    /// Changed in place by the last apply
    Updated,
    /// Removed, remotely or from tracking
    Deleted,
}

impl Lifecycle {
    /// Stage reached after applying `action`.
    #[must_use]
    pub const fn after(self, action: &Action) -> Self {
        match action {
            Action::Create | Action::Replace { .. } => Self::Created,
            Action::Update => Self::Updated,
            Action::Delete => Self::Deleted,
            Action::NoOp => match self {
                Self::Planned | Self::Deleted => self,
                _ => Self::Synced,
            },
        }
    }

    /// Returns true while a remote object is expected to exist.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Created | Self::Synced | Self::Updated)
    }
}

/// Planned action together with the state it should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<S> {
    /// What apply will do
    pub action: Action,
    /// Expected state after apply; `None` when the resource goes away
    pub planned: Option<S>,
}

impl<S> Plan<S> {
    /// Returns true if applying the plan touches the remote side.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.action.has_changes()
    }
}

/// Decide the action for a resource.
///
/// `replace_fields` lists identity attributes whose planned value differs
/// from the prior one; any entry forces a replacement.
#[must_use]
pub fn plan_action<S: PartialEq>(
    prior: Option<&S>,
    planned: Option<&S>,
    replace_fields: &[&str],
) -> Action {
    match (prior, planned) {
        (None, None) => Action::NoOp,
        (None, Some(_)) => Action::Create,
        (Some(_), None) => Action::Delete,
        (Some(_), Some(_)) if !replace_fields.is_empty() => Action::Replace {
            fields: replace_fields.iter().map(ToString::to_string).collect(),
        },
        (Some(prior), Some(planned)) if prior != planned => Action::Update,
        (Some(_), Some(_)) => Action::NoOp,
    }
}
