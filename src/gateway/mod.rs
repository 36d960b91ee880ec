//! HTTP request pipeline for the seller API.
//!
//! The gateway executes one HTTP call per invocation and normalizes
//! heterogeneous success and error payloads into a single result shape:
//! every call yields an immutable [`ResponseOutcome`] whose telemetry
//! (status, headers, raw body, rate-limit figures) belongs to that call
//! alone. Nothing is cached on the gateway between calls, so one instance
//! can safely serve concurrent tasks.
//!
//! HTTP error statuses are not failures at this layer. A 4xx/5xx response
//! with a JSON body returns normally so callers can branch on API-specific
//! error codes; only transport-level failures (timeout, DNS, connection) and
//! error responses whose body is not JSON surface as
//! [`ApiError::Transport`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use sellerlink::gateway::{GatewayConfig, HttpGateway};
//! use serde_json::json;
//!
//! # async fn example() -> sellerlink::Result<()> {
//! let config = GatewayConfig::new("https://api.example.com/v1", "key-123");
//! let mut gateway = HttpGateway::new(config)?;
//!
//! gateway.on_response(|event| {
//!     println!("{} {} -> {} in {}ms", event.method, event.url, event.status, event.duration_ms);
//!     Ok(())
//! });
//!
//! let outcome = gateway.get("/products", json!({"page": 1}), &[]).await?;
//! println!("remaining quota: {}", outcome.rate_limit.remaining);
//! # Ok(())
//! # }
//! ```

use std::time::Instant;

use reqwest::{Client, multipart::Form};
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, Result};

pub mod config;
pub mod events;
pub mod mask;
pub mod rate_limit;

pub use config::GatewayConfig;
pub use events::{ErrorEvent, ErrorKind, EventBus, RequestEvent, ResponseEvent};
pub use rate_limit::RateLimit;

use events::HookResult;
use mask::mask_headers;

/// Pseudo-verb selecting a multipart-encoded POST.
pub const METHOD_MULTIPART: &str = "MULTIPART";

/// Immutable result of a single gateway call.
///
/// Owned exclusively by the call that produced it; the gateway never shares
/// or mutates an outcome after returning it.
#[derive(Debug, Clone)]
pub struct ResponseOutcome {
    /// Correlation token linking this outcome to its lifecycle events.
    pub correlation_id: Uuid,
    /// HTTP status code, `None` when no response was received.
    pub status: Option<u16>,
    /// Canonical status phrase, empty when unknown or no response.
    pub status_text: String,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Raw response body text.
    pub raw_body: String,
    /// Decoded JSON body, or the raw text as a JSON string when the body is
    /// not valid JSON, or `Null` when no response was received.
    pub body: Value,
    /// Quota telemetry extracted from the response headers.
    pub rate_limit: RateLimit,
}

impl ResponseOutcome {
    fn no_response(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            status: None,
            status_text: String::new(),
            headers: Vec::new(),
            raw_body: String::new(),
            body: Value::Null,
            rate_limit: RateLimit::default(),
        }
    }

    /// Looks up a response header case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a response arrived with a non-error status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|s| s < 400)
    }
}

/// Stateful transport for the seller API.
///
/// Composes the [`EventBus`], rate-limit extraction, and header masking
/// around a pooled [`reqwest::Client`]. Register hooks before sharing the
/// gateway between tasks; `request` and the per-verb wrappers take `&self`.
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
    events: EventBus,
}

impl HttpGateway {
    /// Creates a gateway from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the configuration fails validation or
    /// HTTP client creation fails.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config, events: EventBus::new() })
    }

    /// Returns the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Appends a request hook. See [`EventBus::on_request`].
    pub fn on_request<F>(&mut self, hook: F)
    where
        F: Fn(&RequestEvent) -> HookResult + Send + Sync + 'static,
    {
        self.events.on_request(hook);
    }

    /// Appends a response hook. See [`EventBus::on_response`].
    pub fn on_response<F>(&mut self, hook: F)
    where
        F: Fn(&ResponseEvent) -> HookResult + Send + Sync + 'static,
    {
        self.events.on_response(hook);
    }

    /// Appends an error hook. See [`EventBus::on_error`].
    pub fn on_error<F>(&mut self, hook: F)
    where
        F: Fn(&ErrorEvent) -> HookResult + Send + Sync + 'static,
    {
        self.events.on_error(hook);
    }

    /// Executes a single call against the seller API.
    ///
    /// `method` is one of `GET`, `POST`, `PUT`, `PATCH`, `DELETE`, or
    /// [`MULTIPART`](METHOD_MULTIPART), matched case-insensitively. `GET`
    /// sends `params` as a query string, `MULTIPART` as a multipart form
    /// without the JSON content-type, and every other verb as a JSON body.
    /// Default headers (`Accept`, `Content-Type`, `Authorization`) are merged
    /// with `extra_headers`; the caller wins on key collision.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidMethod`] for an unrecognized verb, before any
    ///   network activity.
    /// - [`ApiError::Transport`] for network-level failures and for HTTP
    ///   error statuses whose body is not valid JSON.
    ///
    /// HTTP 4xx/5xx responses with a JSON body return `Ok` with the decoded
    /// body in the outcome.
    #[instrument(skip(self, params, extra_headers))]
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        let verb = method.to_ascii_uppercase();
        let correlation_id = Uuid::new_v4();
        let started = Instant::now();

        let is_multipart = verb == METHOD_MULTIPART;
        let headers = self.merged_headers(extra_headers, is_multipart);

        let mut url = self.join_url(path)?;
        if verb == "GET" {
            append_query(&mut url, &params);
        }

        self.events.emit_request(&RequestEvent {
            correlation_id,
            method: verb.clone(),
            url: url.to_string(),
            headers: mask_headers(&headers),
            params: params.clone(),
        });

        let builder = match verb.as_str() {
            "GET" => self.client.get(url.clone()),
            "POST" => self.client.post(url.clone()).body(json_body(&params)?),
            "PUT" => self.client.put(url.clone()).body(json_body(&params)?),
            "PATCH" => self.client.patch(url.clone()).body(json_body(&params)?),
            "DELETE" => self.client.delete(url.clone()).body(json_body(&params)?),
            METHOD_MULTIPART => self.client.post(url.clone()).multipart(multipart_form(&params)),
            _ => return Err(ApiError::InvalidMethod(method.to_owned())),
        };
        let builder = headers.iter().fold(builder, |b, (name, value)| b.header(name, value));

        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                // No response at all: timeout, DNS failure, connection error.
                let message = error.to_string();
                self.events.emit_error(&ErrorEvent {
                    correlation_id,
                    method: verb,
                    url: url.to_string(),
                    status: None,
                    headers: Vec::new(),
                    raw_body: None,
                    kind: ErrorKind::Transport,
                    message: message.clone(),
                    duration_ms: elapsed_ms(started),
                });
                return Err(ApiError::Transport {
                    message,
                    outcome: Box::new(ResponseOutcome::no_response(correlation_id)),
                });
            }
        };

        self.finish(correlation_id, verb, url.as_str(), response, started).await
    }

    /// Executes a `GET` request. See [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`request`](Self::request).
    pub async fn get(
        &self,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        self.request("GET", path, params, extra_headers).await
    }

    /// Executes a `POST` request. See [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`request`](Self::request).
    pub async fn post(
        &self,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        self.request("POST", path, params, extra_headers).await
    }

    /// Executes a `PUT` request. See [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`request`](Self::request).
    pub async fn put(
        &self,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        self.request("PUT", path, params, extra_headers).await
    }

    /// Executes a `PATCH` request. See [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`request`](Self::request).
    pub async fn patch(
        &self,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        self.request("PATCH", path, params, extra_headers).await
    }

    /// Executes a `DELETE` request. See [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`request`](Self::request).
    pub async fn delete(
        &self,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        self.request("DELETE", path, params, extra_headers).await
    }

    /// Executes a multipart-encoded `POST` request. See
    /// [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`request`](Self::request).
    pub async fn multipart(
        &self,
        path: &str,
        params: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<ResponseOutcome> {
        self.request(METHOD_MULTIPART, path, params, extra_headers).await
    }

    async fn finish(
        &self,
        correlation_id: Uuid,
        method: String,
        url: &str,
        response: reqwest::Response,
        started: Instant,
    ) -> Result<ResponseOutcome> {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_owned();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_owned(), v.to_str().unwrap_or("").to_owned()))
            .collect();
        let rate_limit = RateLimit::from_headers(&headers);
        let masked = mask_headers(&headers);

        let raw_body = match response.text().await {
            Ok(text) => text,
            Err(error) => {
                let message = format!("failed to read response body: {error}");
                self.events.emit_error(&ErrorEvent {
                    correlation_id,
                    method,
                    url: url.to_owned(),
                    status: Some(status.as_u16()),
                    headers: masked,
                    raw_body: None,
                    kind: ErrorKind::Transport,
                    message: message.clone(),
                    duration_ms: elapsed_ms(started),
                });
                return Err(ApiError::Transport {
                    message,
                    outcome: Box::new(ResponseOutcome {
                        correlation_id,
                        status: Some(status.as_u16()),
                        status_text,
                        headers,
                        raw_body: String::new(),
                        body: Value::Null,
                        rate_limit,
                    }),
                });
            }
        };

        let parsed: Option<Value> = serde_json::from_str(&raw_body).ok();
        let duration_ms = elapsed_ms(started);

        if status.is_client_error() || status.is_server_error() {
            let message = format!("seller API returned HTTP {}", status.as_u16());
            self.events.emit_error(&ErrorEvent {
                correlation_id,
                method,
                url: url.to_owned(),
                status: Some(status.as_u16()),
                headers: masked,
                raw_body: Some(raw_body.clone()),
                kind: ErrorKind::HttpStatus,
                message: message.clone(),
                duration_ms,
            });

            let outcome = |body: Value| ResponseOutcome {
                correlation_id,
                status: Some(status.as_u16()),
                status_text: status_text.clone(),
                headers: headers.clone(),
                raw_body: raw_body.clone(),
                body,
                rate_limit,
            };

            return match parsed {
                // API-level errors with a JSON body are normal results so
                // callers can branch on the error code.
                Some(body) => Ok(outcome(body)),
                // A non-JSON error body is unrecoverable at this layer.
                None => Err(ApiError::Transport {
                    message: format!("{message} with a non-JSON body"),
                    outcome: Box::new(outcome(Value::String(raw_body.clone()))),
                }),
            };
        }

        let body = parsed.unwrap_or_else(|| Value::String(raw_body.clone()));
        self.events.emit_response(&ResponseEvent {
            correlation_id,
            method,
            url: url.to_owned(),
            status: status.as_u16(),
            status_text: status_text.clone(),
            headers: masked,
            raw_body: raw_body.clone(),
            rate_limit,
            duration_ms,
        });

        Ok(ResponseOutcome {
            correlation_id,
            status: Some(status.as_u16()),
            status_text,
            headers,
            raw_body,
            body,
            rate_limit,
        })
    }

    /// Merges default headers with caller-supplied ones; the caller wins on
    /// a case-insensitive key collision.
    fn merged_headers(
        &self,
        extra_headers: &[(&str, &str)],
        is_multipart: bool,
    ) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> =
            vec![("Accept".to_owned(), "application/json".to_owned())];
        // Multipart bodies carry a boundary content-type set by the encoder.
        if !is_multipart {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }
        headers.push(("Authorization".to_owned(), self.config.api_key.clone()));

        for (name, value) in extra_headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(existing) => existing.1 = (*value).to_owned(),
                None => headers.push(((*name).to_owned(), (*value).to_owned())),
            }
        }
        headers
    }

    fn join_url(&self, path: &str) -> Result<Url> {
        let full = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
        Url::parse(&full).map_err(|e| ApiError::Config(format!("invalid request URL `{full}`: {e}")))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "durations in ms fit u64 for practical values"
)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn json_body(params: &Value) -> Result<Vec<u8>> {
    let body = if params.is_null() { &Value::Object(Map::new()) } else { params };
    serde_json::to_vec(body)
        .map_err(|e| ApiError::MalformedPayload(format!("request body serialization failed: {e}")))
}

fn multipart_form(params: &Value) -> Form {
    let mut form = Form::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            form = form.text(key.clone(), text_value(value));
        }
    }
    form
}

fn append_query(url: &mut Url, params: &Value) {
    if let Value::Object(map) = params {
        if map.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in map {
            pairs.append_pair(key, &text_value(value));
        }
    }
}

/// Textual form of a parameter value for query strings and form fields:
/// strings verbatim, everything else as compact JSON.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
