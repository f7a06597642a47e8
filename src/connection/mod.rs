//! Control-Plane Connections
//!
//! Serves the line protocol from [`crate::protocol`] over any byte stream.
//! The accept loop spawns one [`handle_connection`] task per client; inside
//! it requests are answered one after another by the shared
//! [`crate::dispatch::RequestManager`].
//!
//! ```text
//! listener.accept() ──spawn──> handle_connection
//!                                 Framed<S, RequestCodec>
//!                                   next() ─> process_request ─> send()
//!                                     ▲                            │
//!                                     └────────────────────────────┘
//! ```

pub mod session;

pub use session::{handle_connection, serve_connection, ListenerStats};
