//! Case-insensitive, concurrent handler table.

use crate::error::DispatchError;
use crate::handler::SharedHandler;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// A registered handler together with the name it was registered under.
#[derive(Clone)]
struct Registration {
    /// Name as the handler reported it (original casing)
    name: String,
    handler: SharedHandler,
}

/// Registry mapping request names to handlers.
///
/// # Thread Safety
///
/// Designed to be shared (usually inside a `RequestManager`) across every
/// dispatch task. `lookup` and `register` may run concurrently.
pub struct HandlerRegistry {
    /// Handlers keyed by lowercased request name
    handlers: DashMap<String, Registration>,
}

/// Normalizes a request name into a registry key.
#[inline]
fn key_for(name: &str) -> String {
    name.to_lowercase()
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Builds a registry from an initial set of handlers.
    ///
    /// When several handlers share a name (ignoring case), the first one in
    /// the sequence is kept and the rest are dropped.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidArgument` if any handler reports a blank
    /// name.
    pub fn new<I>(handlers: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        let registry = Self::empty();

        for handler in handlers {
            if handler.name().trim().is_empty() {
                return Err(DispatchError::invalid_argument(
                    "handler name must not be blank",
                ));
            }
            if !registry.try_insert(handler) {
                debug!("Duplicate handler in initial set ignored");
            }
        }

        Ok(registry)
    }

    /// Adds handlers to the live registry.
    ///
    /// A handler whose name is already present is discarded and the existing
    /// mapping is kept. Every handler is logged, whether or not it was
    /// inserted.
    ///
    /// # Returns
    ///
    /// The number of handlers actually inserted.
    pub fn register<I>(&self, handlers: I) -> usize
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        let mut inserted = 0;

        for handler in handlers {
            let name = handler.name().to_owned();
            info!(request = %name, "Registering request handler");

            if name.trim().is_empty() {
                warn!("Skipping request handler with a blank name");
                continue;
            }

            if self.try_insert(handler) {
                inserted += 1;
            } else {
                debug!(request = %name, "Request handler already registered, keeping existing");
            }
        }

        inserted
    }

    /// Inserts a handler unless its name is taken. Returns true on insert.
    fn try_insert(&self, handler: SharedHandler) -> bool {
        let name = handler.name().to_owned();
        match self.handlers.entry(key_for(&name)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Registration { name, handler });
                true
            }
        }
    }

    /// Finds the handler registered under `name` (case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<SharedHandler> {
        self.handlers
            .get(&key_for(name))
            .map(|entry| entry.handler.clone())
    }

    /// Returns the registered names, in the registry's iteration order.
    pub fn names(&self) -> Vec<String> {
        self.handlers
            .iter()
            .map(|entry| entry.value().name.clone())
            .collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler_fn, CancellationToken};
    use std::sync::Arc;
    use std::thread;

    fn fixed(name: &str, reply: &'static str) -> SharedHandler {
        handler_fn(name, move |_payload, _cancel| async move {
            Ok(Some(reply.to_string()))
        })
    }

    async fn call(handler: &SharedHandler) -> Option<String> {
        handler.handle(None, CancellationToken::new()).await.unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = HandlerRegistry::new(vec![fixed("GetStatus", "ok")]).unwrap();

        assert!(registry.lookup("GetStatus").is_some());
        assert!(registry.lookup("getstatus").is_some());
        assert!(registry.lookup("GETSTATUS").is_some());
        assert!(registry.lookup("gEtStAtUs").is_some());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let registry = HandlerRegistry::new(vec![fixed("GetStatus", "ok")]).unwrap();

        assert!(registry.lookup("Get").is_none());
        assert!(registry.lookup("GetStatus2").is_none());
        assert!(registry.lookup("*").is_none());
        assert!(registry.lookup(" GetStatus").is_none());
    }

    #[tokio::test]
    async fn test_initial_duplicates_first_wins() {
        let registry =
            HandlerRegistry::new(vec![fixed("Ping", "first"), fixed("PING", "second")]).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["Ping".to_string()]);

        let handler = registry.lookup("ping").unwrap();
        assert_eq!(call(&handler).await.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_register_does_not_replace() {
        let registry = HandlerRegistry::new(vec![fixed("Ping", "original")]).unwrap();

        let inserted = registry.register(vec![fixed("ping", "replacement"), fixed("Other", "x")]);
        assert_eq!(inserted, 1);
        assert_eq!(registry.len(), 2);

        let handler = registry.lookup("Ping").unwrap();
        assert_eq!(call(&handler).await.as_deref(), Some("original"));
    }

    #[test]
    fn test_blank_name_rejected_at_construction() {
        let err = HandlerRegistry::new(vec![fixed("  ", "x")]).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArgument { .. }));
    }

    #[test]
    fn test_blank_name_skipped_on_register() {
        let registry = HandlerRegistry::empty();
        assert_eq!(registry.register(vec![fixed("", "x")]), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_preserve_registered_casing() {
        let registry = HandlerRegistry::new(vec![fixed("Bar", "b"), fixed("Baz", "z")]).unwrap();

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["Bar".to_string(), "Baz".to_string()]);
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        let registry = Arc::new(HandlerRegistry::new(vec![fixed("Stable", "s")]).unwrap());
        let mut handles = vec![];

        for t in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    registry.register(vec![fixed(&format!("req-{}-{}", t, i), "v")]);
                    assert!(registry.lookup("stable").is_some());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1 + 8 * 100);
    }

    #[test]
    fn test_concurrent_register_same_name_inserts_once() {
        let registry = Arc::new(HandlerRegistry::empty());
        let mut handles = vec![];

        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || registry.register(vec![fixed("Race", "r")])));
        }

        let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(inserted, 1);
        assert_eq!(registry.len(), 1);
    }
}
