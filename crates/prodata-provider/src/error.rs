//! Errors raised by the reconciliation layer.

use thiserror::Error;

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced to the orchestration layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Failure reported by the API client
    #[error(transparent)]
    Api(#[from] prodata_core::Error),

    /// Tracked or planned state cannot drive the requested operation
    #[error("Invalid {resource} state: {message}")]
    State {
        /// Resource or data source type name
        resource: &'static str,
        /// What is wrong with the state
        message: String,
    },

    /// An operation ran before `Provider::configure` succeeded
    #[error("Provider has not been configured")]
    NotConfigured,
}

impl ProviderError {
    pub(crate) fn state(resource: &'static str, message: impl Into<String>) -> Self {
        Self::State {
            resource,
            message: message.into(),
        }
    }

    /// Returns true if the remote object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodata_core::{ApiError, Error};
    use prodata_core::envelope::ApiErrorDetail;

    #[test]
    fn api_errors_keep_their_message() {
        let err = ProviderError::from(Error::Api(ApiError::new(
            200,
            vec![ApiErrorDetail {
                code: 404,
                message: "not found".to_string(),
            }],
        )));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error: [404] not found");
    }

    #[test]
    fn state_error_display() {
        let err = ProviderError::state("prodata_volume", "id is not known");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Invalid prodata_volume state: id is not known");
    }
}
