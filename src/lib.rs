//! Client library core for an e-commerce seller HTTP API.
//!
//! Two layers make up the crate. The [`gateway`] executes HTTP calls and
//! normalizes every response into an immutable [`ResponseOutcome`] carrying
//! status, headers, raw and decoded body, and rate-limit telemetry; lifecycle
//! hooks on the [`gateway::EventBus`] observe each call with sensitive
//! headers masked. The [`codec`] turns decoded bodies into typed DTOs driven
//! by static [`Schema`](codec::Schema) descriptors, with tolerant or strict
//! handling of unknown fields.
//!
//! ```text
//!   caller ── request ──► HttpGateway ── HTTP ──► seller API
//!                │                                    │
//!                ▼                                    ▼
//!           EventBus hooks ◄── events ◄── ResponseOutcome
//!                                              │
//!                                              ▼
//!                                     Dto::from_response
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use sellerlink::{Dto, GatewayConfig, HttpGateway};
//! use sellerlink::codec::{Field, FieldKind, Schema};
//! use serde::{Deserialize, Serialize};
//! use serde_json::{Map, Value, json};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Product {
//!     id: i64,
//!     name: String,
//!     #[serde(flatten)]
//!     extra: Map<String, Value>,
//! }
//!
//! static PRODUCT_FIELDS: [Field; 2] = [
//!     Field { name: "id", kind: FieldKind::Integer },
//!     Field { name: "name", kind: FieldKind::String },
//! ];
//! static PRODUCT_SCHEMA: Schema = Schema { name: "Product", fields: &PRODUCT_FIELDS };
//!
//! impl Dto for Product {
//!     fn schema() -> &'static Schema {
//!         &PRODUCT_SCHEMA
//!     }
//!     fn extra(&self) -> &Map<String, Value> {
//!         &self.extra
//!     }
//!     fn extra_mut(&mut self) -> &mut Map<String, Value> {
//!         &mut self.extra
//!     }
//! }
//!
//! # async fn example() -> sellerlink::Result<()> {
//! let gateway = HttpGateway::new(GatewayConfig::new("https://api.example.com/v1", "key-123"))?;
//! let outcome = gateway.get("/products/42", json!({}), &[]).await?;
//!
//! if outcome.is_success() {
//!     let product = Product::from_response(&outcome, false)?;
//!     println!("{} (quota left: {})", product.name, outcome.rate_limit.remaining);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module organization
//!
//! - [`gateway`]: HTTP pipeline, configuration, lifecycle events, header
//!   masking, rate-limit extraction.
//! - [`codec`]: schema descriptors, type coercion, the [`Dto`] trait.
//! - [`error`]: the crate-wide [`ApiError`] taxonomy.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod codec;
pub mod error;
pub mod gateway;

pub use codec::Dto;
pub use error::{ApiError, Result};
pub use gateway::{
    ErrorEvent, ErrorKind, EventBus, GatewayConfig, HttpGateway, RateLimit, RequestEvent,
    ResponseEvent, ResponseOutcome,
};
