//! Blocking client for the Sendy email-marketing API.
//!
//! # Overview
//! Sendy answers every call with a short plain-text body (`1`, `Subscriber
//! deleted`, `42`, `Invalid API key`, ...). This crate turns typed method
//! calls into form-encoded POSTs and those bodies back into typed results.
//!
//! # Design
//! - `SendyClient` is stateless apart from its `ClientConfig`.
//! - Every operation funnels through one `RequestExecutor`, which attaches
//!   the API key, notifies a `RequestObserver`, sends through a `Transport`
//!   and applies the `ResponseGuard` before the operation's own rule.
//! - `Transport` works on plain `HttpRequest`/`HttpResponse` data; the
//!   default `UreqTransport` does blocking I/O and `testing::MockTransport`
//!   replays canned bodies.
//!
//! ```no_run
//! use sendy_core::{ClientConfig, SendyClient, SubscribeOptions};
//!
//! let config = ClientConfig::new("https://newsletter.example.com", "api-key");
//! let client = SendyClient::new(config)?;
//! let subscribed = client.subscribe("list-id", "jane@example.com", &SubscribeOptions::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http;
pub mod observer;
pub mod params;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod types;

pub use classify::{ErrorSubstringGuard, Expect, PermissiveGuard, ResponseGuard};
pub use client::SendyClient;
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, ConfigError, TransportError};
pub use executor::RequestExecutor;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use observer::{NoopObserver, RequestObserver, TracingObserver};
pub use params::{CustomFieldLayout, CustomFields, FormParams, ListIds};
pub use transport::UreqTransport;
pub use types::{Campaign, SubscribeOptions, SubscriberStatus, UpdateSubscriber};
