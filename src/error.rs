//! Dispatch Error Taxonomy
//!
//! Every failure the dispatcher can observe is expressed as a
//! [`DispatchError`]. Errors never escape `process_request`; instead each one
//! is classified into an [`ErrorKind`] and translated into a status code plus
//! a `{"message": ...}` payload.
//!
//! ## Classification
//!
//! ```text
//! ┌──────────────────────┬────────────────────┬────────┐
//! │ Variant              │ Kind               │ Status │
//! ├──────────────────────┼────────────────────┼────────┤
//! │ BlankRequestName     │ InvalidRequest     │  400   │
//! │ UnknownRequest       │ InvalidRequest     │  400   │
//! │ InvalidArgument      │ InvalidRequest     │  400   │
//! │ HandlerFailure       │ HandlerFailure     │  500   │
//! │ Unexpected           │ UnexpectedFailure  │  500   │
//! └──────────────────────┴────────────────────┴────────┘
//! ```

use crate::dispatch::StatusCode;
use thiserror::Error;

/// Coarse failure categories surfaced to callers through the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blank or unknown request name, or an invalid argument.
    InvalidRequest,
    /// The handler ran and reported a failure.
    HandlerFailure,
    /// Anything else, such as a handler that panicked.
    UnexpectedFailure,
}

/// Errors produced while building a dispatcher or dispatching a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request name was empty or whitespace only.
    #[error("request name must not be blank")]
    BlankRequestName,

    /// No handler is registered under the requested name.
    #[error("request '{name}' not found; supported requests are: {supported}")]
    UnknownRequest {
        /// The name as the caller sent it.
        name: String,
        /// Comma-joined list of registered request names.
        supported: String,
    },

    /// An argument supplied by the host was rejected.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The handler returned an error.
    #[error("{source:#}")]
    HandlerFailure {
        /// Registered name of the failing handler.
        request: String,
        #[source]
        source: anyhow::Error,
    },

    /// A failure outside the anticipated categories.
    #[error("{message}")]
    Unexpected { message: String },
}

impl DispatchError {
    /// Creates an unknown request error listing the supported names.
    pub fn unknown_request<I, S>(name: impl Into<String>, supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let supported = supported
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");
        Self::UnknownRequest {
            name: name.into(),
            supported,
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wraps a handler failure.
    pub fn handler_failure(request: impl Into<String>, source: anyhow::Error) -> Self {
        Self::HandlerFailure {
            request: request.into(),
            source,
        }
    }

    /// Creates an unexpected failure.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BlankRequestName | Self::UnknownRequest { .. } | Self::InvalidArgument { .. } => {
                ErrorKind::InvalidRequest
            }
            Self::HandlerFailure { .. } => ErrorKind::HandlerFailure,
            Self::Unexpected { .. } => ErrorKind::UnexpectedFailure,
        }
    }

    /// Returns the status code reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidRequest => StatusCode::BadRequest,
            ErrorKind::HandlerFailure | ErrorKind::UnexpectedFailure => {
                StatusCode::InternalServerError
            }
        }
    }
}
