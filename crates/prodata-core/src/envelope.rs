//! The response wrapper shared by every ProData API endpoint.

use crate::error::{ApiError, Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single error entry reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Server-defined error code
    #[serde(default)]
    pub code: i64,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

/// `{success, data, errors}` wrapper around every response body.
///
/// `data` is kept as raw JSON until the envelope has been checked, so a failed
/// envelope never gets its payload decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the operation succeeded
    #[serde(default)]
    pub success: bool,
    /// Payload, meaningful only when `success` is true
    #[serde(default)]
    pub data: T,
    /// Error entries, populated when `success` is false
    #[serde(default, deserialize_with = "nullable_errors")]
    pub errors: Vec<ApiErrorDetail>,
}

fn nullable_errors<'de, D>(deserializer: D) -> std::result::Result<Vec<ApiErrorDetail>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ApiErrorDetail>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Envelope<Value> {
    /// Parse a raw response body into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body is not a JSON object of the
    /// envelope shape.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| Error::Decode(format!("invalid response envelope: {err}")))?;
        // The derived impl would also accept the positional array form.
        if !value.is_object() {
            return Err(Error::Decode(
                "invalid response envelope: expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|err| Error::Decode(format!("invalid response envelope: {err}")))
    }

    /// Fail with [`Error::Api`] unless the envelope reports success.
    ///
    /// # Errors
    ///
    /// Returns the joined server errors when `success` is false.
    pub fn into_success(self, status: u16) -> Result<Value> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::Api(ApiError::new(status, self.errors)))
        }
    }

    /// Check the envelope and decode its payload into `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for failed envelopes and [`Error::Decode`] when
    /// `data` does not match `R`.
    pub fn into_data<R>(self, status: u16) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let data = self.into_success(status)?;
        serde_json::from_value(data)
            .map_err(|err| Error::Decode(format!("unexpected response data: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: i64,
    }

    #[test]
    fn success_envelope_decodes_data() {
        let env = Envelope::parse(br#"{"success":true,"data":{"id":7},"errors":[]}"#).unwrap();
        let thing: Thing = env.into_data(200).unwrap();
        assert_eq!(thing, Thing { id: 7 });
    }

    #[test]
    fn failed_envelope_without_errors_is_unknown() {
        let env = Envelope::parse(br#"{"success":false,"errors":[]}"#).unwrap();
        let err = env.into_data::<Thing>(200).unwrap_err();
        match err {
            Error::Api(api) => assert_eq!(api.message, "unknown error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_envelope_ignores_data() {
        let env = Envelope::parse(
            br#"{"success":false,"data":{"id":"garbage"},"errors":[{"code":404,"message":"not found"}]}"#,
        )
        .unwrap();
        let err = env.into_data::<Thing>(200).unwrap_err();
        assert_eq!(err.to_string(), "API error: [404] not found");
    }

    #[test]
    fn null_errors_are_treated_as_empty() {
        let env = Envelope::parse(br#"{"success":false,"errors":null}"#).unwrap();
        assert!(env.errors.is_empty());
    }

    #[test]
    fn non_envelope_body_is_decode_error() {
        let err = Envelope::parse(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn non_object_json_is_decode_error() {
        for body in [&br#"[false]"#[..], br#"[true,{"id":1},[]]"#, b"null", b"true", b"42"] {
            let err = Envelope::parse(body).unwrap_err();
            assert!(
                matches!(err, Error::Decode(_)),
                "body {} gave {err:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        let env = Envelope {
            success: true,
            data: json!({"id": "seven"}),
            errors: vec![],
        };
        let err = env.into_data::<Thing>(200).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
