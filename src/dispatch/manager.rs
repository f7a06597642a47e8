//! Request Manager
//!
//! [`RequestManager`] is the boundary that turns named requests into
//! responses. It never returns an error and never lets a handler panic
//! escape: every failure becomes a `400` or `500` [`Response`].
//!
//! ## Dispatch
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        process_request                           │
//! │                                                                  │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐   ┌───────┐  │
//! │  │ validate │──>│  lookup  │──>│ handle + deadline│──>│  map  │  │
//! │  └──────────┘   └──────────┘   └──────────────────┘   └───────┘  │
//! │       │              │                  │                 ▲      │
//! │       └──────────────┴──────────────────┴─── errors ──────┘      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use super::deadline::run_with_deadline;
use super::response::Response;
use super::stats::DispatchStats;
use crate::error::DispatchError;
use crate::handler::{CancellationToken, SharedHandler};
use crate::registry::HandlerRegistry;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Routes named requests to registered handlers.
///
/// Cloning is cheap: clones share the same registry and statistics, so a
/// manager can be handed to every connection or task.
///
/// # Example
///
/// ```
/// use reqdispatch::dispatch::{RequestManager, StatusCode};
/// use reqdispatch::handler::{PingHandler, SharedHandler};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let manager = RequestManager::new(
///     vec![Arc::new(PingHandler) as SharedHandler],
///     Duration::from_secs(30),
/// )
/// .unwrap();
///
/// let response = manager.process_request("PING", None).await;
/// assert_eq!(response.status, StatusCode::Ok);
///
/// let response = manager.process_request("restart", None).await;
/// assert_eq!(response.status, StatusCode::BadRequest);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct RequestManager {
    /// Registered handlers
    registry: Arc<HandlerRegistry>,
    /// Cancellation deadline applied to every dispatch
    max_timeout: Duration,
    /// Shared dispatch counters
    stats: Arc<DispatchStats>,
}

impl RequestManager {
    /// Creates a manager from an initial set of handlers.
    ///
    /// Duplicate names keep the first handler. The timeout applies to every
    /// request name alike.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidArgument` if a handler has a blank name.
    pub fn new<I>(handlers: I, max_timeout: Duration) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        let registry = HandlerRegistry::new(handlers)?;
        Ok(Self::with_registry(Arc::new(registry), max_timeout))
    }

    /// Creates a manager around an existing registry.
    pub fn with_registry(registry: Arc<HandlerRegistry>, max_timeout: Duration) -> Self {
        Self {
            registry,
            max_timeout,
            stats: Arc::new(DispatchStats::new()),
        }
    }

    /// Registers additional handlers. Names already present are left alone.
    ///
    /// # Returns
    ///
    /// The number of handlers newly added.
    pub fn register_handlers<I>(&self, handlers: I) -> usize
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.registry.register(handlers)
    }

    /// The registry backing this manager.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The per-dispatch cancellation deadline.
    pub fn max_timeout(&self) -> Duration {
        self.max_timeout
    }

    /// Dispatch counters.
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Dispatches one request.
    ///
    /// # Arguments
    ///
    /// * `name` - Request name, matched case-insensitively
    /// * `payload` - Opaque request payload, passed through to the handler
    ///
    /// # Returns
    ///
    /// Always a response: `200` with the handler's payload, `400` for a blank
    /// or unknown name, `500` for any other failure.
    pub async fn process_request(&self, name: &str, payload: Option<&str>) -> Response {
        self.stats.request_received();

        match self.dispatch(name, payload).await {
            Ok(response_payload) => {
                self.stats.request_succeeded();
                Response::ok(response_payload)
            }
            Err(e) => {
                warn!(request = %name, error = %e, "Error handling request");
                self.stats.request_failed();
                Response::from_error(&e)
            }
        }
    }

    /// Validates, looks up and invokes. Every failure is returned as an error.
    async fn dispatch(
        &self,
        name: &str,
        payload: Option<&str>,
    ) -> Result<Option<String>, DispatchError> {
        if name.trim().is_empty() {
            return Err(DispatchError::BlankRequestName);
        }

        if payload.map_or(true, |p| p.trim().is_empty()) {
            info!(request = %name, "Received request");
        } else {
            info!(request = %name, "Received request with payload");
        }

        let handler = self
            .registry
            .lookup(name)
            .ok_or_else(|| DispatchError::unknown_request(name, self.registry.names()))?;

        let cancel = CancellationToken::new();
        // `handle` runs inside the async block so a panic raised before it
        // yields a future is caught as well.
        let call = AssertUnwindSafe(async { handler.handle(payload, cancel.clone()).await })
            .catch_unwind();
        let outcome = run_with_deadline(call, &cancel, self.max_timeout).await;

        if outcome.deadline_exceeded {
            self.stats.deadline_exceeded();
            warn!(
                request = %name,
                timeout = ?self.max_timeout,
                "Request completed after its deadline"
            );
        }

        match outcome.output {
            Ok(Ok(response_payload)) => {
                info!(request = %name, "Successfully handled request");
                Ok(response_payload)
            }
            Ok(Err(source)) => Err(DispatchError::handler_failure(handler.name(), source)),
            Err(panic) => Err(DispatchError::unexpected(format!(
                "handler '{}' panicked: {}",
                handler.name(),
                panic_message(panic.as_ref())
            ))),
        }
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
