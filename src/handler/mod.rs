//! Request Handler Module
//!
//! Handlers are the business logic behind each named request. The dispatcher
//! only knows them through the [`RequestHandler`] trait: a name used as the
//! registry key, and an async `handle` operation that receives the optional
//! payload plus a cancellation token.
//!
//! ## Cancellation
//!
//! ```text
//!  dispatch ──> handle(payload, token) ─────────────────────> result
//!                     │                                         ▲
//!                     │      max_timeout elapses                │
//!                     └──────> token.cancel() ── (advisory) ────┘
//! ```
//!
//! The token is advisory: the dispatcher keeps awaiting `handle` after it
//! fires. A handler that wants to stop early should watch
//! [`CancellationToken::cancelled`] and return [`RequestCancelled`].
//!
//! ## Example
//!
//! ```
//! use reqdispatch::handler::{handler_fn, RequestHandler};
//!
//! let upper = handler_fn("Upper", |payload, _cancel| async move {
//!     Ok(payload.map(|p| p.to_uppercase()))
//! });
//! assert_eq!(upper.name(), "Upper");
//! ```

pub mod builtin;
pub mod function;

pub use builtin::{EchoHandler, PingHandler};
pub use function::{handler_fn, FnHandler};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
pub use tokio_util::sync::CancellationToken;

/// A unit of business logic registered under a request name.
///
/// Implementations are shared across concurrent dispatches, so they must be
/// `Send + Sync` and safe to call from several tasks at once.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// The request name this handler answers to (matched case-insensitively).
    fn name(&self) -> &str;

    /// Handles one request.
    ///
    /// # Arguments
    ///
    /// * `payload` - The opaque request payload, if the caller sent one
    /// * `cancel` - Fires once the dispatcher's maximum timeout elapses
    ///
    /// # Returns
    ///
    /// The response payload (which may be absent), or any error.
    async fn handle(
        &self,
        payload: Option<&str>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Option<String>>;
}

/// Shared handle to a handler, as stored in the registry.
pub type SharedHandler = Arc<dyn RequestHandler>;

/// Error a handler may return after observing its cancellation token.
#[derive(Debug, Clone, Error)]
#[error("request '{request}' was cancelled after {elapsed:?}")]
pub struct RequestCancelled {
    /// Name of the cancelled request.
    pub request: String,
    /// Time spent before the handler gave up.
    pub elapsed: Duration,
}

impl RequestCancelled {
    /// Creates a cancellation error.
    pub fn new(request: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            request: request.into(),
            elapsed,
        }
    }
}
