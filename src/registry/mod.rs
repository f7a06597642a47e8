//! Handler Registry Module
//!
//! Maps request names to handlers. Names are compared case-insensitively and
//! the first handler registered under a name keeps it: later registrations of
//! the same name are ignored.
//!
//! ## Concurrency
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HandlerRegistry                         │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │  DashMap  │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Registration only write-locks the shard holding the new key, so lookups
//! of other names proceed while handlers are being added. Insert-if-absent is
//! a single atomic entry operation.
//!
//! ## Example
//!
//! ```
//! use reqdispatch::handler::{EchoHandler, PingHandler, SharedHandler};
//! use reqdispatch::registry::HandlerRegistry;
//! use std::sync::Arc;
//!
//! let handlers = vec![Arc::new(PingHandler) as SharedHandler];
//! let registry = HandlerRegistry::new(handlers).unwrap();
//!
//! registry.register(vec![Arc::new(EchoHandler) as SharedHandler]);
//!
//! assert!(registry.lookup("PING").is_some());
//! assert!(registry.lookup("Echo").is_some());
//! assert!(registry.lookup("ech").is_none());
//! ```

pub mod table;

pub use table::HandlerRegistry;
