//! Dispatch responses.
//!
//! A [`Response`] is the `(status code, optional payload)` pair returned for
//! every dispatch. Error payloads are JSON objects with a `message` field.

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status codes a dispatch can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    /// The handler completed successfully.
    Ok = 200,
    /// Blank or unknown request name.
    BadRequest = 400,
    /// The handler failed, or something unexpected went wrong.
    InternalServerError = 500,
}

impl StatusCode {
    /// Returns the numeric code.
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns true for `200`.
    #[inline]
    pub fn is_success(self) -> bool {
        self == StatusCode::Ok
    }

    /// Returns the canonical reason phrase.
    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.as_u16()
    }
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub message: String,
}

/// Encodes `{"message": <message>}`.
pub fn error_payload(message: &str) -> String {
    serde_json::json!({ "message": message }).to_string()
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Outcome category.
    pub status: StatusCode,
    /// Handler-defined payload on success, `{"message": ...}` on error.
    pub payload: Option<String>,
}

impl Response {
    /// Creates a successful response.
    pub fn ok(payload: Option<String>) -> Self {
        Self {
            status: StatusCode::Ok,
            payload,
        }
    }

    /// Translates a dispatch error into its response.
    pub fn from_error(error: &DispatchError) -> Self {
        Self {
            status: error.status_code(),
            payload: Some(error_payload(&error.to_string())),
        }
    }

    /// Returns true if the dispatch succeeded.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parses the `message` field of an error payload, if there is one.
    pub fn error_message(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        let payload = self.payload.as_deref()?;
        serde_json::from_str::<ErrorBody>(payload)
            .ok()
            .map(|body| body.message)
    }

    /// Splits the response into `(status code, payload)`.
    pub fn into_parts(self) -> (u16, Option<String>) {
        (self.status.as_u16(), self.payload)
    }
}
