//! Observability events and the hook dispatcher.
//!
//! The gateway emits one [`RequestEvent`] before every call and either a
//! [`ResponseEvent`] or an [`ErrorEvent`] after it, in that order. Hooks are
//! registered on the [`EventBus`] before the gateway is shared between tasks;
//! emission iterates each list in registration order.
//!
//! A failing hook must never affect the call or later hooks: failures are
//! logged via [`tracing::warn!`] under the `hooks` target and otherwise
//! discarded. Header lists on events are already passed through
//! [`mask_headers`](crate::gateway::mask::mask_headers), so credentials never
//! reach hook code.

use serde_json::Value;
use uuid::Uuid;

use crate::gateway::rate_limit::RateLimit;

/// Outcome of a single hook invocation.
pub type HookResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Hook invoked before the request is dispatched.
pub type RequestHook = Box<dyn Fn(&RequestEvent) -> HookResult + Send + Sync>;
/// Hook invoked after a response with a success status.
pub type ResponseHook = Box<dyn Fn(&ResponseEvent) -> HookResult + Send + Sync>;
/// Hook invoked after a transport failure or an HTTP error status.
pub type ErrorHook = Box<dyn Fn(&ErrorEvent) -> HookResult + Send + Sync>;

/// Classification attached to an [`ErrorEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response: timeout, DNS failure, connection error.
    Transport,
    /// A response arrived with an HTTP error status (4xx/5xx).
    HttpStatus,
}

impl ErrorKind {
    /// Returns the string form used in structured logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::HttpStatus => "http_status",
        }
    }
}

/// Immutable snapshot of an outgoing request, emitted before dispatch.
#[derive(Debug, Clone)]
pub struct RequestEvent {
    /// Opaque token linking this request's lifecycle events.
    pub correlation_id: Uuid,
    /// Uppercased verb, e.g. `GET` or `MULTIPART`.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// Merged request headers, sensitive values masked.
    pub headers: Vec<(String, String)>,
    /// Structured request payload.
    pub params: Value,
}

/// Immutable snapshot of a successful response.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    /// Correlation token of the originating request.
    pub correlation_id: Uuid,
    /// Uppercased verb of the originating request.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Canonical status phrase, empty if unknown.
    pub status_text: String,
    /// Response headers, sensitive values masked.
    pub headers: Vec<(String, String)>,
    /// Raw response body text.
    pub raw_body: String,
    /// Quota telemetry extracted from the response headers.
    pub rate_limit: RateLimit,
    /// Wall-clock duration of the call in milliseconds.
    pub duration_ms: u64,
}

/// Immutable snapshot of a failed call.
///
/// Emitted both for transport failures (`status == None`) and for responses
/// with an HTTP error status (`status == Some(_)`); the latter still return
/// normally to the caller when the body decodes as JSON.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// Correlation token of the originating request.
    pub correlation_id: Uuid,
    /// Uppercased verb of the originating request.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// HTTP status code, `None` when no response was received.
    pub status: Option<u16>,
    /// Response headers if a response was received, sensitive values masked.
    pub headers: Vec<(String, String)>,
    /// Raw response body text, `None` when no response was received.
    pub raw_body: Option<String>,
    /// Failure classification.
    pub kind: ErrorKind,
    /// Failure description.
    pub message: String,
    /// Wall-clock duration of the call in milliseconds.
    pub duration_ms: u64,
}

/// Ordered hook lists for the three event channels.
///
/// Registration is append-only and takes `&mut self`: configure all hooks
/// before the owning gateway is shared between tasks. Emission takes `&self`
/// and is safe to run concurrently once registration has finished.
#[derive(Default)]
pub struct EventBus {
    request: Vec<RequestHook>,
    response: Vec<ResponseHook>,
    error: Vec<ErrorHook>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("request_hooks", &self.request.len())
            .field("response_hooks", &self.response.len())
            .field("error_hooks", &self.error.len())
            .finish()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request hook.
    pub fn on_request<F>(&mut self, hook: F)
    where
        F: Fn(&RequestEvent) -> HookResult + Send + Sync + 'static,
    {
        self.request.push(Box::new(hook));
    }

    /// Appends a response hook.
    pub fn on_response<F>(&mut self, hook: F)
    where
        F: Fn(&ResponseEvent) -> HookResult + Send + Sync + 'static,
    {
        self.response.push(Box::new(hook));
    }

    /// Appends an error hook.
    pub fn on_error<F>(&mut self, hook: F)
    where
        F: Fn(&ErrorEvent) -> HookResult + Send + Sync + 'static,
    {
        self.error.push(Box::new(hook));
    }

    /// Invokes all request hooks in registration order.
    pub fn emit_request(&self, event: &RequestEvent) {
        for (index, hook) in self.request.iter().enumerate() {
            if let Err(error) = hook(event) {
                warn_hook_failure("request", index, &event.correlation_id, error.as_ref());
            }
        }
    }

    /// Invokes all response hooks in registration order.
    pub fn emit_response(&self, event: &ResponseEvent) {
        for (index, hook) in self.response.iter().enumerate() {
            if let Err(error) = hook(event) {
                warn_hook_failure("response", index, &event.correlation_id, error.as_ref());
            }
        }
    }

    /// Invokes all error hooks in registration order.
    pub fn emit_error(&self, event: &ErrorEvent) {
        for (index, hook) in self.error.iter().enumerate() {
            if let Err(error) = hook(event) {
                warn_hook_failure("error", index, &event.correlation_id, error.as_ref());
            }
        }
    }
}

fn warn_hook_failure(
    channel: &'static str,
    index: usize,
    correlation_id: &Uuid,
    error: &(dyn std::error::Error + Send + Sync),
) {
    tracing::warn!(
        target: "hooks",
        channel,
        index,
        correlation_id = %correlation_id,
        error = %error,
        "observer hook failed"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn request_event() -> RequestEvent {
        RequestEvent {
            correlation_id: Uuid::new_v4(),
            method: "GET".to_owned(),
            url: "https://api.example.com/v1/products".to_owned(),
            headers: vec![],
            params: Value::Null,
        }
    }

    fn error_event() -> ErrorEvent {
        ErrorEvent {
            correlation_id: Uuid::new_v4(),
            method: "POST".to_owned(),
            url: "https://api.example.com/v1/orders".to_owned(),
            status: None,
            headers: vec![],
            raw_body: None,
            kind: ErrorKind::Transport,
            message: "connection refused".to_owned(),
            duration_ms: 12,
        }
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.on_request(move |_| {
                order.lock().unwrap().push(tag);
                Ok(())
            });
        }

        bus.emit_request(&request_event());
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_hook_does_not_block_later_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        bus.on_request(|_| Err("boom".into()));
        {
            let calls = Arc::clone(&calls);
            bus.on_request(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        bus.emit_request(&request_event());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_channel_is_independent() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        {
            let seen = Arc::clone(&seen);
            bus.on_error(move |event| {
                assert_eq!(event.kind, ErrorKind::Transport);
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        bus.emit_request(&request_event());
        bus.emit_error(&error_event());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_with_no_hooks_is_a_noop() {
        let bus = EventBus::new();
        bus.emit_request(&request_event());
        bus.emit_error(&error_event());
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Transport.as_str(), "transport");
        assert_eq!(ErrorKind::HttpStatus.as_str(), "http_status");
    }

    #[test]
    fn test_event_bus_debug_reports_counts() {
        let mut bus = EventBus::new();
        bus.on_request(|_| Ok(()));
        bus.on_request(|_| Ok(()));

        let debug = format!("{bus:?}");
        assert!(debug.contains("request_hooks: 2"));
    }
}
