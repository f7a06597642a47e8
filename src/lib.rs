//! # reqdispatch - Named Request Dispatcher
//!
//! `reqdispatch` routes named, string-payload requests to pluggable handlers,
//! bounds every dispatch with a cooperative cancellation deadline, and turns
//! every outcome into a uniform `(status code, payload)` response.
//!
//! ## Features
//!
//! - **Case-Insensitive Registry**: handlers keyed by request name, first registration wins
//! - **Never Fails Outward**: blank/unknown names map to `400`, handler failures and panics to `500`
//! - **Cooperative Timeouts**: each dispatch gets a fresh token that fires after `max_timeout`
//! - **Concurrent**: registration and lookup proceed side by side; dispatches are independent
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                          reqdispatch                              │
//! │                                                                   │
//! │  ┌──────────────┐   ┌──────────────┐   ┌───────────────────────┐  │
//! │  │ TCP listener │──>│ Connection   │──>│    RequestManager     │  │
//! │  │  (main.rs)   │   │  + protocol  │   │ validate/lookup/invoke│  │
//! │  └──────────────┘   └──────────────┘   └───────────┬───────────┘  │
//! │                                                    │              │
//! │                         ┌──────────────────────────┼──────────┐   │
//! │                         ▼                          ▼          │   │
//! │                ┌─────────────────┐     ┌─────────────────────┐│   │
//! │                │ HandlerRegistry │     │ RequestHandler impls││   │
//! │                │    (DashMap)    │     │  (host supplied)    ││   │
//! │                └─────────────────┘     └─────────────────────┘│   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transport pieces (`protocol`, `connection`, the binary) are optional
//! conveniences; hosts can call [`RequestManager::process_request`] directly.
//!
//! ## Quick Start
//!
//! ```
//! use reqdispatch::handler::{handler_fn, SharedHandler};
//! use reqdispatch::RequestManager;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let status = handler_fn("GetStatus", |_payload, _cancel| async move {
//!     Ok(Some(r#"{"state":"running"}"#.to_string()))
//! });
//!
//! let manager = RequestManager::new(vec![status as SharedHandler], Duration::from_secs(60))
//!     .unwrap();
//!
//! let (code, payload) = manager.process_request("getstatus", None).await.into_parts();
//! assert_eq!(code, 200);
//! assert_eq!(payload.as_deref(), Some(r#"{"state":"running"}"#));
//!
//! let (code, _) = manager.process_request("  ", None).await.into_parts();
//! assert_eq!(code, 400);
//! # });
//! ```
//!
//! ## Module Overview
//!
//! - [`handler`]: The `RequestHandler` trait, closure handlers and built-ins
//! - [`registry`]: Concurrent, case-insensitive handler registry
//! - [`dispatch`]: `RequestManager`, responses, deadlines and counters
//! - [`error`]: Dispatch error taxonomy
//! - [`protocol`]: Line framing for the bundled control-plane listener
//! - [`connection`]: Per-client connection loop

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod registry;

// Re-export commonly used types for convenience
pub use connection::{handle_connection, ListenerStats};
pub use dispatch::{RequestManager, Response, StatusCode};
pub use error::{DispatchError, ErrorKind};
pub use handler::{handler_fn, CancellationToken, RequestCancelled, RequestHandler, SharedHandler};
pub use registry::HandlerRegistry;

use std::time::Duration;

/// The default port the control-plane listener binds to
pub const DEFAULT_PORT: u16 = 7878;

/// The default host the control-plane listener binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// The default per-dispatch cancellation deadline
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_secs(60);

/// Version of reqdispatch
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
