//! Error types for the seller API client.
//!
//! All errors implement the standard [`std::error::Error`] trait via
//! [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Transport errors** ([`ApiError::Transport`]): network-level failures
//!   with no usable response
//! - **Caller errors** ([`ApiError::InvalidMethod`], [`ApiError::Config`]):
//!   input validation failures raised before any network activity
//! - **Codec errors** ([`ApiError::MalformedPayload`],
//!   [`ApiError::UnknownField`], [`ApiError::InvalidEnumValue`],
//!   [`ApiError::InvalidDateTime`]): decode and coercion violations
//!
//! HTTP error statuses (4xx/5xx) with a JSON body are deliberately *not*
//! errors: the gateway returns them as normal [`ResponseOutcome`] values so
//! callers can branch on API-specific error codes.

use thiserror::Error;

use crate::gateway::ResponseOutcome;

/// Result type alias for client operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur in the seller API client.
///
/// This type implements `#[must_use]` to ensure errors are not silently
/// ignored. Always handle errors by checking, propagating, or explicitly
/// panicking.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, timeout, or DNS-level failure with no usable response.
    ///
    /// The attached [`ResponseOutcome`] carries whatever telemetry the call
    /// produced before failing. `outcome.status` is `None` when no response
    /// was received at all (timeout, connection refused, DNS failure) and
    /// `Some(_)` when a response arrived but its error body could not be
    /// decoded as JSON.
    #[error("transport failure: {message}")]
    Transport {
        /// Human-readable failure description.
        message: String,
        /// Telemetry gathered for this call before it failed.
        outcome: Box<ResponseOutcome>,
    },

    /// Unsupported HTTP verb passed to the gateway.
    ///
    /// Raised before any network activity; this is a caller bug.
    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),

    /// Input text or response body did not decode as structured data where
    /// structured data was required.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Strict-mode decode encountered a field absent from the DTO schema.
    #[error("unknown field `{field}` for {dto}")]
    UnknownField {
        /// The offending input key.
        field: String,
        /// Name of the target DTO type.
        dto: &'static str,
    },

    /// Coercion encountered a value outside an enum's declared set.
    #[error("invalid value `{value}` for enum {name}")]
    InvalidEnumValue {
        /// String form of the rejected raw value.
        value: String,
        /// Name of the enum type.
        name: &'static str,
    },

    /// Coercion could not parse a date/time representation.
    #[error("invalid date-time value: {0}")]
    InvalidDateTime(String),

    /// Gateway configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_method_display() {
        let error = ApiError::InvalidMethod("TRACE".to_owned());
        assert_eq!(error.to_string(), "unsupported HTTP method: TRACE");
    }

    #[test]
    fn test_unknown_field_display() {
        let error = ApiError::UnknownField { field: "color".to_owned(), dto: "Product" };
        assert_eq!(error.to_string(), "unknown field `color` for Product");
    }

    #[test]
    fn test_invalid_enum_value_display() {
        let error = ApiError::InvalidEnumValue { value: "UNKNOWN_TAG".to_owned(), name: "Tag" };
        assert!(error.to_string().contains("UNKNOWN_TAG"));
        assert!(error.to_string().contains("Tag"));
    }

    #[test]
    fn test_malformed_payload_display() {
        let error = ApiError::MalformedPayload("not an object".to_owned());
        assert!(error.to_string().contains("malformed payload"));
    }
}
