//! Request Dispatch Module
//!
//! This module implements the dispatch layer: it receives a request name and
//! an optional payload, finds the matching handler, runs it under a
//! per-call cancellation deadline, and folds every outcome into a
//! [`Response`].
//!
//! ## Architecture
//!
//! ```text
//! Transport / host
//!       │  process_request(name, payload)
//!       ▼
//! ┌─────────────────┐
//! │ RequestManager  │  (this module)
//! │                 │
//! │  - Validate     │
//! │  - Lookup       │──────> HandlerRegistry
//! │  - Invoke       │──────> RequestHandler::handle(payload, token)
//! │  - Map outcome  │
//! └────────┬────────┘
//!          │  Response { status, payload }
//!          ▼
//! Transport / host
//! ```
//!
//! ## Per-call States
//!
//! `Received → Validating → LookingUp → Invoking → {Succeeded | Failed} → Responded`
//!
//! No retries are attempted here; that is left to callers or handlers.
//!
//! ## Status Codes
//!
//! - `200` - handler returned successfully (payload is whatever it returned)
//! - `400` - blank or unknown request name
//! - `500` - handler failure or unexpected failure (including a panic)
//!
//! Error responses always carry `{"message": "..."}`.

pub mod deadline;
pub mod manager;
pub mod response;
pub mod stats;

pub use deadline::{run_with_deadline, Deadlined};
pub use manager::RequestManager;
pub use response::{error_payload, ErrorBody, Response, StatusCode};
pub use stats::DispatchStats;
