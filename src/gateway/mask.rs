//! Header redaction for observability payloads.
//!
//! Events handed to observer hooks carry request and response headers for
//! logging and metrics. Credential-bearing values must never leave the
//! gateway unmasked, so every header list passes through here first.

/// Replacement marker for sensitive header values.
pub const MASKED_VALUE: &str = "********";

/// Header names whose values are always redacted, matched case-insensitively.
const SENSITIVE_HEADERS: [&str; 4] =
    ["authorization", "proxy-authorization", "api-key", "x-api-key"];

/// Checks whether a header name carries credentials.
#[must_use]
pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|s| name.eq_ignore_ascii_case(s))
}

/// Returns a copy of `headers` with sensitive values replaced by
/// [`MASKED_VALUE`].
///
/// All other headers pass through unchanged. Pure function, no state.
///
/// # Examples
///
/// ```
/// use sellerlink::gateway::mask::{mask_headers, MASKED_VALUE};
///
/// let headers = vec![
///     ("Authorization".to_owned(), "secret".to_owned()),
///     ("X-Custom".to_owned(), "v".to_owned()),
/// ];
///
/// let masked = mask_headers(&headers);
/// assert_eq!(masked[0].1, MASKED_VALUE);
/// assert_eq!(masked[1].1, "v");
/// ```
#[must_use]
pub fn mask_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            if is_sensitive(name) {
                (name.clone(), MASKED_VALUE.to_owned())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}
