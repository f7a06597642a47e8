//! Closure-backed handlers.
//!
//! [`handler_fn`] turns an async closure into a [`RequestHandler`], which is
//! handy for hosts with small handlers and for tests.

use super::{CancellationToken, RequestHandler};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// A handler that forwards each call to a closure.
///
/// The closure receives an owned copy of the payload so the returned future
/// can be `'static`.
pub struct FnHandler<F, Fut>
where
    F: Fn(Option<String>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    name: String,
    func: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnHandler<F, Fut>
where
    F: Fn(Option<String>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    /// Creates a new closure handler.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> fmt::Debug for FnHandler<F, Fut>
where
    F: Fn(Option<String>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F, Fut>
where
    F: Fn(Option<String>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(
        &self,
        payload: Option<&str>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Option<String>> {
        (self.func)(payload.map(str::to_owned), cancel).await
    }
}

/// Builds a shared handler from an async closure.
pub fn handler_fn<F, Fut>(name: impl Into<String>, func: F) -> Arc<FnHandler<F, Fut>>
where
    F: Fn(Option<String>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    Arc::new(FnHandler::new(name, func))
}
