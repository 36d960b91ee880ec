//! Rate-limit telemetry extracted from response headers.
//!
//! The seller API reports quota figures on every response via the
//! `X-RateLimit-*` headers. The gateway snapshots them into a [`RateLimit`]
//! value attached to each [`ResponseOutcome`](crate::gateway::ResponseOutcome)
//! so callers can pace themselves; the client itself never throttles.

/// Header carrying the total request quota for the current window.
pub const HEADER_LIMIT: &str = "X-RateLimit-Limit";
/// Header carrying the requests remaining in the current window.
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
/// Header carrying the epoch second at which the window resets.
pub const HEADER_RESET: &str = "X-RateLimit-Reset";
/// Header carrying the suggested retry delay in seconds.
pub const HEADER_RETRY: &str = "X-RateLimit-Retry";

/// Quota figures reported by the remote API for a single response.
///
/// Missing or non-numeric header values normalize to 0, so a default
/// instance means "no rate-limit information available".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Total quota for the current window.
    pub limit: u64,
    /// Requests remaining in the current window.
    pub remaining: u64,
    /// Epoch second at which the window resets.
    pub reset: u64,
    /// Suggested retry delay in seconds.
    pub retry: u64,
}

impl RateLimit {
    /// Extracts rate-limit figures from a response header list.
    ///
    /// Header names match case-insensitively. Absent or non-numeric values
    /// yield 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use sellerlink::gateway::rate_limit::RateLimit;
    ///
    /// let headers = vec![
    ///     ("X-RateLimit-Limit".to_owned(), "100".to_owned()),
    ///     ("X-RateLimit-Remaining".to_owned(), "5".to_owned()),
    /// ];
    ///
    /// let rate = RateLimit::from_headers(&headers);
    /// assert_eq!(rate.limit, 100);
    /// assert_eq!(rate.remaining, 5);
    /// assert_eq!(rate.reset, 0);
    /// ```
    #[must_use]
    pub fn from_headers(headers: &[(String, String)]) -> Self {
        Self {
            limit: numeric_header(headers, HEADER_LIMIT),
            remaining: numeric_header(headers, HEADER_REMAINING),
            reset: numeric_header(headers, HEADER_RESET),
            retry: numeric_header(headers, HEADER_RETRY),
        }
    }
}

fn numeric_header(headers: &[(String, String)], name: &str) -> u64 {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0)
}
